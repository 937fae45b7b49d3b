//! Structured logging infrastructure for relprune

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "relprune=trace")
    pub level: String,
    /// Whether to colorize console output
    pub ansi: bool,
    /// Whether to include target module information
    pub include_targets: bool,
    /// Optional file path for log output instead of stdout
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            ansi: true,
            include_targets: false,
            file_path: None,
        }
    }
}

impl LoggingConfig {
    /// Create a configuration with the given level filter
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Build the env filter; `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Must be called once, at process start.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let layer = fmt::layer()
        .with_target(config.include_targets)
        .with_file(false)
        .with_line_number(false);

    if let Some(file_path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        registry
            .with(layer.with_ansi(false).with_writer(std::sync::Mutex::new(file)))
            .try_init()?;
    } else {
        registry.with(layer.with_ansi(config.ansi)).try_init()?;
    }

    Ok(())
}
