//! Error handling module for the artifacts addon
//!
//! Compiling the addon never fails: missing credentials degrade to emitted
//! diagnostics. These error types cover everything around it, mainly loading
//! and parsing configuration files.

use thiserror::Error;

/// Main error type for the artifacts addon
#[derive(Error, Debug)]
pub enum AddonError {
    /// IO errors (reading config files, writing scripts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (unsupported value shapes, bad top-level type)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (missing credentials)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for addon operations
pub type Result<T> = std::result::Result<T, AddonError>;

impl AddonError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
