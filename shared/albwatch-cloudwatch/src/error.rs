//! Error types for the monitoring query SDK

/// Result type alias
pub type Result<T> = std::result::Result<T, CloudWatchError>;

/// Monitoring API query errors
#[derive(Debug, thiserror::Error)]
pub enum CloudWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}
