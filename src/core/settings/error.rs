//! Error types for the settings module.
//!
//! One taxonomy for the whole load/save lifecycle. The important
//! distinction is between `NotFound` (expected on first run, absorbed
//! silently) and the genuinely failing kinds (`Io`, `Timeout`,
//! `PartialSave`) which the save path surfaces to the caller.

use thiserror::Error;

/// Unified error type for settings persistence and validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Config blob or secret-store entry absent. Expected on first run;
    /// never logged as a failure by the load path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store unreachable or a write was rejected.
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed value (e.g. API key prefix). Non-fatal; reflected only in
    /// indicator state, never aborts a save.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Some save sub-operations failed while others succeeded. Carries the
    /// descriptions of the failed sub-operations.
    #[error("Partial save failure: {}", .0.join("; "))]
    PartialSave(Vec<String>),

    /// An I/O call exceeded the bounded deadline.
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl SettingsError {
    /// Create a not-found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an IO error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a timeout error with the given message.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Whether this is the ignorable absent-entry kind. Used to keep
    /// best-effort deletes from masking unexpected failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(e.to_string())
        } else {
            Self::Io(e.to_string())
        }
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
