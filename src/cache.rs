// 🗄️ Entity Cache - The loaded catalogue, owned by the composition root
//
// Lifecycle: empty at startup → populated by a load → read by every query
// until the next load replaces it. Replacement swaps one Arc, so readers see
// either the old collection or the new one, never a mix.
//
// At most one load runs at a time. Callers of get_all() that arrive while a
// load is in flight wait for it and reuse its outcome instead of fetching
// again.

use crate::entities::Startup;
use crate::error::{LoadError, RowError};
use crate::normalizer::Normalizer;
use crate::parser::{RowParser, SkippedRow};
use crate::schema::FeedSchema;
use crate::source::DataSource;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What one successful load produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub schema_version: String,
    pub accepted: usize,
    pub skipped_blank: usize,
    pub skipped_short: usize,
}

impl LoadSummary {
    fn new(schema_version: &str, accepted: usize, skipped: &[SkippedRow]) -> Self {
        let skipped_blank = skipped
            .iter()
            .filter(|s| s.reason == RowError::Blank)
            .count();

        LoadSummary {
            schema_version: schema_version.to_string(),
            accepted,
            skipped_blank,
            skipped_short: skipped.len() - skipped_blank,
        }
    }
}

pub struct EntityCache<S: DataSource> {
    source: S,
    parser: RowParser,
    schema: FeedSchema,
    /// Fixed load date; None = local date at load time
    today: Option<NaiveDate>,

    snapshot: RwLock<Option<Arc<[Startup]>>>,
    last_error: RwLock<Option<LoadError>>,

    load_gate: Mutex<()>,
    /// Completed load attempts (success or failure)
    attempts: AtomicU64,
}

impl<S: DataSource> EntityCache<S> {
    pub fn new(source: S, schema: FeedSchema) -> Self {
        EntityCache {
            source,
            parser: RowParser::new(),
            schema,
            today: None,
            snapshot: RwLock::new(None),
            last_error: RwLock::new(None),
            load_gate: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Builder: parse with a different delimiter / quote
    pub fn with_parser(mut self, parser: RowParser) -> Self {
        self.parser = parser;
        self
    }

    /// Builder: pin the date used for the dateAdded default
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn schema(&self) -> &FeedSchema {
        &self.schema
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    /// One fetch-and-parse cycle; on success the cache is replaced
    ///
    /// On failure the previous collection (or emptiness) is kept and the
    /// error is returned to the caller.
    pub async fn load(&self) -> Result<LoadSummary, LoadError> {
        let _gate = self.load_gate.lock().await;
        self.load_locked().await
    }

    async fn load_locked(&self) -> Result<LoadSummary, LoadError> {
        let outcome = self.fetch_and_normalize().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok((startups, summary)) => {
                *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::from(startups));
                *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = None;

                info!(
                    source = %self.source.describe(),
                    schema = %summary.schema_version,
                    accepted = summary.accepted,
                    skipped_blank = summary.skipped_blank,
                    skipped_short = summary.skipped_short,
                    "catalogue loaded"
                );
                Ok(summary)
            }
            Err(error) => {
                warn!(source = %self.source.describe(), %error, "catalogue load failed");
                *self.last_error.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(error.clone());
                Err(error)
            }
        }
    }

    async fn fetch_and_normalize(&self) -> Result<(Vec<Startup>, LoadSummary), LoadError> {
        let text = self.source.fetch().await?;

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let parsed = self.parser.parse_feed(&text);
        let normalized = Normalizer::new(self.schema.clone(), today).normalize_feed(&parsed);

        let summary = LoadSummary::new(
            &self.schema.version,
            normalized.startups.len(),
            &normalized.skipped,
        );
        Ok((normalized.startups, summary))
    }

    // ========================================================================
    // READING
    // ========================================================================

    /// Current collection, loading first only if nothing was ever loaded
    ///
    /// A failed load yields an empty collection (already logged); the
    /// failure itself is available from `last_error()`.
    pub async fn get_all(&self) -> Arc<[Startup]> {
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _gate = self.load_gate.lock().await;

        // Someone finished a load while we waited: share its outcome
        if self.attempts.load(Ordering::Acquire) != seen {
            return self.snapshot_or_empty();
        }
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        // Failure already logged in load_locked
        let _ = self.load_locked().await;
        self.snapshot_or_empty()
    }

    /// Current collection without triggering a load
    pub fn current(&self) -> Option<Arc<[Startup]>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn snapshot_or_empty(&self) -> Arc<[Startup]> {
        self.current().unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Linear lookup in the current collection
    pub fn get_by_id(&self, id: &str) -> Option<Startup> {
        self.current()?.iter().find(|s| s.id == id).cloned()
    }

    /// Has any load ever succeeded?
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Error of the most recent load, None after a success
    pub fn last_error(&self) -> Option<LoadError> {
        self.last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
