//! Configuration loading: defaults, then an optional TOML file, then the
//! environment, with a dotenv file filling in variables the environment lacks.

use crate::schema::Config;
use relprune_common::{split_csv, PruneError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dotenv file read by [`ConfigLoader::from_env`].
pub const DEFAULT_DOTENV_PATH: &str = ".env";
/// Environment variable naming the optional TOML file.
pub const ENV_CONFIG_PATH: &str = "RELPRUNE_CONFIG";
/// Environment variable holding the access token.
pub const ENV_TOKEN: &str = "DISCORD_TOKEN";
/// Environment variable holding the comma-separated allow-list.
pub const ENV_ALLOW_LIST: &str = "ALLOW_LIST";
/// Environment variable holding the concurrency limit.
pub const ENV_CONCURRENCY_LIMIT: &str = "CONCURRENCY_LIMIT";
/// Environment variable toggling dry-run mode.
pub const ENV_DRY_RUN: &str = "DRY_RUN";
/// Environment variable holding the dry-run delay in milliseconds.
pub const ENV_DRY_RUN_DELAY_MS: &str = "DRY_RUN_DELAY_MS";
/// Environment variable holding the cache file path.
pub const ENV_CACHE_PATH: &str = "CACHE_PATH";
/// Environment variable holding the date format.
pub const ENV_DATE_FORMAT: &str = "DATE_FORMAT";
/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "DISCORD_API_URL";
/// Environment variable holding the log filter.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Assembles a [`Config`] from its sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    dotenv: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader that reads the given TOML file first.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            dotenv: None,
        }
    }

    /// Creates a loader whose file path comes from `RELPRUNE_CONFIG`, if set,
    /// and which reads `.env` from the working directory.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
            dotenv: Some(PathBuf::from(DEFAULT_DOTENV_PATH)),
        }
    }

    /// Also read variables from the dotenv file at `path`.
    ///
    /// Variables already present in the environment win over the file.
    #[must_use]
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv = Some(path.into());
        self
    }

    /// The TOML file this loader reads, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The dotenv file this loader reads, if any.
    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv.as_deref()
    }

    /// Loads and validates configuration from the process environment.
    pub fn load(&self) -> Result<Config> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads and validates configuration using `env` as the variable source.
    ///
    /// Keys `env` does not know are looked up in the dotenv file, if one is
    /// configured. A missing dotenv file is ignored; a malformed one is a
    /// config error.
    pub fn load_with<F>(&self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dotenv = match &self.dotenv {
            Some(path) => read_dotenv(path)?,
            None => HashMap::new(),
        };
        let env = |key: &str| env(key).or_else(|| dotenv.get(key).cloned());

        let path = self
            .path
            .clone()
            .or_else(|| env(ENV_CONFIG_PATH).map(PathBuf::from));
        let mut config = match &path {
            Some(path) => Self::read_file(path)?,
            None => Config::default(),
        };
        apply_env(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Config> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|e| {
            PruneError::config_field(format!("invalid TOML: {e}"), path.display().to_string())
        })
    }
}

/// Reads `KEY=value` pairs from a dotenv file. A missing file yields nothing.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            debug!("No dotenv file at {}", path.display());
            return Ok(HashMap::new());
        }
        Err(e) => return Err(dotenv_error(path, &e)),
    };
    entries
        .map(|entry| entry.map_err(|e| dotenv_error(path, &e)))
        .collect()
}

fn dotenv_error(path: &Path, err: &dotenvy::Error) -> PruneError {
    PruneError::config_field(
        format!("invalid dotenv file: {err}"),
        path.display().to_string(),
    )
}

/// Overlays environment variables onto `config`.
pub fn apply_env<F>(config: &mut Config, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = env(ENV_TOKEN) {
        config.discord.token = token.trim().to_string();
    }
    if let Some(list) = env(ENV_ALLOW_LIST) {
        config.purge.allow_list = split_csv(&list);
    }
    if let Some(raw) = env(ENV_CONCURRENCY_LIMIT) {
        config.purge.concurrency_limit = parse_number(&raw, ENV_CONCURRENCY_LIMIT)?;
    }
    if let Some(raw) = env(ENV_DRY_RUN) {
        config.purge.dry_run = parse_bool(&raw, ENV_DRY_RUN)?;
    }
    if let Some(raw) = env(ENV_DRY_RUN_DELAY_MS) {
        config.purge.dry_run_delay_ms = parse_number(&raw, ENV_DRY_RUN_DELAY_MS)?;
    }
    if let Some(path) = env(ENV_CACHE_PATH) {
        config.cache.path = PathBuf::from(path);
    }
    if let Some(format) = env(ENV_DATE_FORMAT) {
        config.display.date_format = format;
    }
    if let Some(url) = env(ENV_API_URL) {
        config.discord.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(level) = env(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| PruneError::config_field(format!("expected a number, got {raw:?}"), key))
}

fn parse_bool(raw: &str, key: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(PruneError::config_field(
            format!("expected a boolean, got {raw:?}"),
            key,
        )),
    }
}
