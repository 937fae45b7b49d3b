//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

/// Default Discord API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v9";
/// Default number of concurrent deletions.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 100;
/// Default snapshot file name.
pub const DEFAULT_CACHE_PATH: &str = "friends_cache.json";
/// Default "friends since" format.
pub const DEFAULT_DATE_FORMAT: &str = "%H:%M %d.%m.%Y";

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            purge: PurgeConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            dry_run: false,
            dry_run_delay_ms: 2000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(DEFAULT_CACHE_PATH),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            file: None,
        }
    }
}
