//! Error types for the switch control client

/// Errors that can occur while talking to the switch tree backend
#[derive(Debug, thiserror::Error)]
pub enum SwitchControlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP error! status: {status} ({path})")]
    Status { status: u16, path: String },

    #[error("Request aborted")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid switch key: {0}")]
    InvalidSwitchKey(String),
}

/// Result type alias for switch control operations
pub type Result<T> = std::result::Result<T, SwitchControlError>;
