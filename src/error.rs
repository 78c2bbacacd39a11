//! Error taxonomy shared across the pipeline.
//!
//! Every runtime error here is soft: it removes one instrument from a cycle or
//! drops one notification. Only [`ConfigError`] stops the process, and only at
//! startup.

use thiserror::Error;

/// Series too short, or an indicator undefined at the evaluation point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsufficientData {
    #[error("series has {len} points, at least {min} required")]
    TooShort { len: usize, min: usize },

    #[error("{indicator} is undefined at the latest point")]
    Undefined { indicator: &'static str },
}

/// Fetching one instrument's price series failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed candle payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid candle timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("no candles returned for {0}")]
    Empty(String),
}

impl ProviderError {
    /// Whether retrying the same request can plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// The messaging sink refused or could not be reached.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging endpoint rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Invalid or missing startup configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
