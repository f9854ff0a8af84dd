// 🧹 Entity Normalizer - Positional row → Startup
// Applies a FeedSchema to parsed rows: trim, default, split, coerce

use crate::attributes::Coercion;
use crate::entities::startup::{non_blank, split_list};
use crate::entities::{Startup, StartupCategory};
use crate::error::RowError;
use crate::parser::{ParsedFeed, RawRow, SkippedRow};
use crate::schema::FeedSchema;
use chrono::NaiveDate;
use tracing::debug;

/// Normalizer bound to one schema and one load date
///
/// The load date feeds the `Today` coercion (dateAdded default) and is
/// injectable so normalization stays deterministic under test.
#[derive(Debug, Clone)]
pub struct Normalizer {
    schema: FeedSchema,
    today: NaiveDate,
}

/// Entities produced from a feed plus the rows that did not make it
#[derive(Debug, Clone, Default)]
pub struct NormalizedFeed {
    pub startups: Vec<Startup>,
    pub skipped: Vec<SkippedRow>,
}

impl Normalizer {
    pub fn new(schema: FeedSchema, today: NaiveDate) -> Self {
        Normalizer { schema, today }
    }

    pub fn schema(&self) -> &FeedSchema {
        &self.schema
    }

    /// Re-point at another layout without touching parsing or filtering
    pub fn with_schema(mut self, schema: FeedSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Map one row of field values to a Startup
    ///
    /// `id` is assigned by the caller. Rows narrower than the schema are
    /// rejected rather than padded, so no attribute is invented from a
    /// missing position. A row of empty fields is still a row: it becomes a
    /// startup with an empty name (blank lines are dropped by the parser).
    pub fn normalize(&self, id: impl Into<String>, fields: &[String]) -> Result<Startup, RowError> {
        let expected = self.schema.width();
        if fields.len() < expected {
            return Err(RowError::ShapeMismatch {
                expected,
                found: fields.len(),
            });
        }

        let mut startup = Startup::new(id, String::new());

        for column in &self.schema.columns {
            let value = fields[column.index].trim();

            match column.effective_coercion() {
                Coercion::Text => startup.set_text(column.attribute, non_blank(value)),
                Coercion::List => startup.set_list(column.attribute, split_list(value)),
                Coercion::Category => startup.category = Some(StartupCategory::coerce(value)),
                Coercion::DefaultText(default) => {
                    let value = non_blank(value).unwrap_or(default);
                    startup.set_text(column.attribute, Some(value));
                }
                Coercion::Today => {
                    let value = non_blank(value)
                        .unwrap_or_else(|| self.today.format("%Y-%m-%d").to_string());
                    startup.set_text(column.attribute, Some(value));
                }
            }
        }

        Ok(startup)
    }

    /// Normalize a parsed feed; each row's id is its line index
    pub fn normalize_rows(&self, rows: &[RawRow]) -> NormalizedFeed {
        let mut feed = NormalizedFeed::default();

        for row in rows {
            match self.normalize(row.line_number.to_string(), &row.fields) {
                Ok(startup) => feed.startups.push(startup),
                Err(reason) => {
                    debug!(line = row.line_number, %reason, "row rejected by normalizer");
                    feed.skipped.push(SkippedRow {
                        line_number: row.line_number,
                        reason,
                    });
                }
            }
        }

        feed
    }

    /// Normalize everything the parser accepted, carrying its skips along
    pub fn normalize_feed(&self, parsed: &ParsedFeed) -> NormalizedFeed {
        let mut feed = self.normalize_rows(&parsed.rows);
        let mut skipped = parsed.skipped.clone();
        skipped.append(&mut feed.skipped);
        skipped.sort_by_key(|s| s.line_number);
        feed.skipped = skipped;
        feed
    }
}

// ============================================================================
// TESTS
// ============================================================================
