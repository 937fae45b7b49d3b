//! Runtime validation of an assembled configuration.

use crate::schema::Config;
use relprune_common::{PruneError, Result};
use tokio::sync::Semaphore;
use url::Url;

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.is_empty() {
            return Err(PruneError::auth("Discord token is missing"));
        }

        if self.purge.concurrency_limit == 0 {
            return Err(PruneError::config_field(
                "concurrency limit must be at least 1",
                "purge.concurrency_limit",
            ));
        }
        if self.purge.concurrency_limit > Semaphore::MAX_PERMITS {
            return Err(PruneError::config_field(
                format!(
                    "concurrency limit must be at most {}",
                    Semaphore::MAX_PERMITS
                ),
                "purge.concurrency_limit",
            ));
        }

        let url = Url::parse(&self.discord.api_base_url).map_err(|e| {
            PruneError::config_field(format!("invalid API URL: {e}"), "discord.api_base_url")
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PruneError::config_field(
                format!("unsupported URL scheme {:?}", url.scheme()),
                "discord.api_base_url",
            ));
        }

        if self.cache.enabled && self.cache.path.as_os_str().is_empty() {
            return Err(PruneError::config_field(
                "cache path cannot be empty while the cache is enabled",
                "cache.path",
            ));
        }

        Ok(())
    }
}
