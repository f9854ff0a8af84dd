// Startup Directory - Core Library
// Feed parsing, normalization, facets and filtering for the startup catalogue.
// The UI (or the bundled JSON server) calls into this crate; it owns no presentation.

pub mod attributes;  // Attribute catalogue + coercion kinds
pub mod cache;       // Entity Cache: coalesced loads, atomic replacement
pub mod config;
pub mod entities;    // Startup + closed category set
pub mod error;
pub mod facets;      // Distinct option lists + funding bounds
pub mod filter;      // FilterSpec + evaluator
pub mod normalizer;  // Row → Startup under a FeedSchema
pub mod parser;      // Quote-aware row splitting
pub mod schema;      // Versioned column layouts
pub mod source;      // Where feed text comes from

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use attributes::{Attribute, Coercion, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_URL};
pub use cache::{EntityCache, LoadSummary};
pub use config::DirectoryConfig;
pub use entities::{clean_amount, parse_calendar_date, Startup, StartupCategory};
pub use error::{LoadError, RowError, SchemaError};
pub use facets::{distinct_values, funding_amount_range, FacetIndex, FundingRange, DEFAULT_FUNDING_CEILING};
pub use filter::{evaluate, ActiveFilter, FilterField, FilterSpec, RoundDateWindow};
pub use normalizer::{NormalizedFeed, Normalizer};
pub use parser::{ParsedFeed, RawRow, RowParser, SkippedRow};
pub use schema::{ColumnMapping, FeedSchema};
pub use source::{DataSource, HttpSource, StaticSource, DEFAULT_FEED_URL};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
