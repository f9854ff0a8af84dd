// ⚠️ Error Taxonomy
// Every failure a load can meet, and where it gets absorbed
//
// - LoadError   -> cache boundary (empty result + warning)
// - RowError    -> feed splitting / normalizer (row skipped)
// - SchemaError -> configuration time (schema document rejected)
//
// Numeric, date and category problems are not errors at all: they are
// absorbed inside the entity model (see entities::startup).

use thiserror::Error;

/// FetchFailure - the data source could not produce feed text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Non-2xx response from the remote document
    #[error("feed request returned status {0}")]
    Status(u16),

    /// Connection, DNS, TLS or timeout problem
    #[error("feed transport error: {0}")]
    Transport(String),

    /// Response arrived but the body could not be read as text
    #[error("feed body could not be read: {0}")]
    Body(String),
}

/// RowShapeMismatch - a line that cannot become an entity
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("blank line")]
    Blank,

    #[error("expected at least {expected} fields, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

/// A schema document that cannot drive the normalizer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema '{version}' maps column {index} more than once")]
    DuplicateColumn { version: String, index: usize },

    #[error("schema '{version}' maps attribute '{attribute}' more than once")]
    DuplicateAttribute { version: String, attribute: String },

    #[error("schema '{version}' cannot apply coercion '{coercion}' to attribute '{attribute}'")]
    IncompatibleCoercion {
        version: String,
        attribute: String,
        coercion: String,
    },

    #[error("schema '{version}' does not map the required 'name' attribute")]
    MissingName { version: String },

    #[error("unknown schema version '{0}'")]
    UnknownVersion(String),
}
