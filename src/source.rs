// 🌐 Data Source - Where the raw feed text comes from
//
// The catalogue lives in an externally owned spreadsheet published as CSV.
// The core only consumes its serialized text; everything that can go wrong
// on the way collapses into LoadError.

use crate::error::LoadError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Published catalogue sheet (CSV export)
pub const DEFAULT_FEED_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTM_SokHVT-LPgKn7bVoMTVub9HLfNJpxTmH_PhUUhA9T_EVRNPQ6a0fPYxOb-aiZ-mDgiYvuhoDOni/pub?output=csv";

/// DataSource - one fetch of the raw delimited text
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

// ============================================================================
// HTTP SOURCE
// ============================================================================

pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("startup-directory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        Ok(HttpSource {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        debug!(url = %self.url, "fetching feed");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::Body(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ============================================================================
// STATIC SOURCE
// ============================================================================

/// In-memory feed: fixed text or a fixed failure
///
/// Used for tests and for serving a snapshot file without a network hop.
#[derive(Debug, Clone)]
pub struct StaticSource {
    outcome: Result<String, LoadError>,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        StaticSource {
            outcome: Ok(text.into()),
        }
    }

    pub fn failing(error: LoadError) -> Self {
        StaticSource {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        self.outcome.clone()
    }

    fn describe(&self) -> String {
        "in-memory feed".to_string()
    }
}
