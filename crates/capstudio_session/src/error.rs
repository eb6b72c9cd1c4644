//! Error types for the session crate.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur during session operations.
///
/// Turn-level failures (a backend call that errors) never escape the
/// session API; they are converted into conversation content. What remains
/// here are caller mistakes and the backend trait's own error channel.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("No active plan to operate on")]
    NoActivePlan,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
