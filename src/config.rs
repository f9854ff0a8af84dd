// ⚙️ Configuration - Environment-driven settings for the binaries
//
// STARTUP_DIRECTORY_FEED_URL      feed location (default: published sheet)
// STARTUP_DIRECTORY_SCHEMA        v1 | v2 | v3 | path to a JSON schema (default: v3)
// STARTUP_DIRECTORY_TIMEOUT_SECS  HTTP timeout (default: 30)
// STARTUP_DIRECTORY_BIND          server listen address (default: 0.0.0.0:3000)

use crate::schema::FeedSchema;
use crate::source::DEFAULT_FEED_URL;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const ENV_FEED_URL: &str = "STARTUP_DIRECTORY_FEED_URL";
pub const ENV_SCHEMA: &str = "STARTUP_DIRECTORY_SCHEMA";
pub const ENV_TIMEOUT_SECS: &str = "STARTUP_DIRECTORY_TIMEOUT_SECS";
pub const ENV_BIND: &str = "STARTUP_DIRECTORY_BIND";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    pub feed_url: String,
    pub schema: FeedSchema,
    pub timeout: Duration,
    pub bind_addr: String,
}

impl DirectoryConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Read settings from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = move |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let feed_url = get(ENV_FEED_URL).unwrap_or(DEFAULT_FEED_URL).to_string();

        let schema = match get(ENV_SCHEMA) {
            Some(value) => resolve_schema(value)?,
            None => FeedSchema::latest(),
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_addr = get(ENV_BIND).unwrap_or(DEFAULT_BIND).to_string();

        Ok(DirectoryConfig {
            feed_url,
            schema,
            timeout: Duration::from_secs(timeout_secs),
            bind_addr,
        })
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        DirectoryConfig {
            feed_url: DEFAULT_FEED_URL.to_string(),
            schema: FeedSchema::latest(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND.to_string(),
        }
    }
}

/// Built-in version name, or a path to a JSON schema document
fn resolve_schema(value: &str) -> Result<FeedSchema> {
    match FeedSchema::by_version(value) {
        Ok(schema) => Ok(schema),
        Err(_) if Path::new(value).exists() => FeedSchema::load_file(Path::new(value)),
        Err(e) => Err(e).with_context(|| format!("{} is neither a known version nor a file", ENV_SCHEMA)),
    }
}
