//! Logging initialization with environment-based formatters
//!
//! - Production: Structured JSON logs for cloud monitoring
//! - Sandbox: Colorful, human-readable logs for development
//! - Optional plain-text copy to a file

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{is_production, AppConfig};

/// Explicit logging settings, built once in `main`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub json: bool,
    pub default_filter: String,
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            default_filter: "info".to_string(),
            log_file: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            json: is_production(&config.environment),
            log_file: config.log_file.clone(),
            ..Self::default()
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let json_layer = config.json.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stdout)
    });

    let human_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(std::io::stdout)
    });

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(human_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
