//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for relprune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord API configuration.
    pub discord: DiscordConfig,
    /// Deletion run configuration.
    pub purge: PurgeConfig,
    /// Relationship cache configuration.
    pub cache: CacheConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// Logging configuration.
    pub logging: LogConfig,
}

/// Discord API configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// User access token, sent verbatim in the `Authorization` header.
    pub token: String,
    /// API base URL, without trailing slash.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

// Keeps the token out of debug output.
impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &relprune_common::mask_secret(&self.token, 5))
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Deletion run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Usernames or display names that are never deleted.
    pub allow_list: Vec<String>,
    /// Maximum number of deletions in flight at once.
    pub concurrency_limit: usize,
    /// Log and sleep instead of calling the delete endpoint.
    pub dry_run: bool,
    /// Simulated latency of a dry-run deletion, in milliseconds.
    pub dry_run_delay_ms: u64,
}

/// Relationship cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the fetched list is written to disk.
    pub enabled: bool,
    /// Location of the snapshot file.
    pub path: PathBuf,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for "friends since" timestamps.
    pub date_format: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing filter directive.
    pub level: String,
    /// Optional log file; stdout when unset.
    pub file: Option<String>,
}

impl LogConfig {
    /// Convert into the logging setup understood by `relprune-common`.
    pub fn to_logging_config(&self) -> relprune_common::LoggingConfig {
        relprune_common::LoggingConfig {
            level: self.level.clone(),
            file_path: self.file.clone(),
            ..relprune_common::LoggingConfig::default()
        }
    }
}
