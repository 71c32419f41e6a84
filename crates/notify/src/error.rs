//! Error types for notification delivery.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a [`crate::WebhookTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The webhook answered with a non-success status
    #[error("Webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors that escape [`crate::DeliveryController::run`].
#[derive(Debug, Error)]
pub enum NotifyError {
    /// `webhookUrl` asked for the test endpoint but none is configured
    #[error("Test webhook URL not found in {}", path.display())]
    TestUrlNotFound { path: PathBuf },

    /// The test endpoint file exists but could not be read
    #[error("Failed to read test webhook URL from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
