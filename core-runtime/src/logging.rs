//! # Logging Bootstrap
//!
//! Structured logging with the `tracing` crate: env-filter based module
//! filtering and a choice of pretty or JSON output. Host applications call
//! [`init_logging`] once at startup; library crates only ever use the
//! `tracing` macros.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for development
    #[default]
    Pretty,
    /// Line-delimited JSON for ingestion
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"core_sync=debug,info"`.
    /// `RUST_LOG` overrides this when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Fails if called twice or if the filter directive is invalid.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::Logging(format!("Invalid filter directive: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| Error::Logging(e.to_string())),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .map_err(|e| Error::Logging(e.to_string())),
    }
}
