//! Generation backend seam.
//!
//! The session never performs the generative call itself: an external
//! collaborator produces either free text or a structured interactive plan,
//! and the session accepts the result. This trait is that boundary; the CLI
//! ships an offline rule-based implementation, tests mock it.

use async_trait::async_trait;

use capstudio_parse::InteractivePlan;

use crate::error::SessionResult;

/// A payload produced by the generation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantPayload {
    /// Free text, possibly embedding fenced file regions
    Text(String),
    /// An already-structured interactive plan
    Plan(InteractivePlan),
}

/// Read-only session context handed to the backend with each prompt.
#[derive(Debug, Clone)]
pub struct BackendContext {
    /// Current project name
    pub project: String,
    /// Flat rendering of current file contents, one `File: <path>` block
    /// per file
    pub files_listing: String,
    /// Whether this is the planning turn (no real generation has happened
    /// yet)
    pub first_turn: bool,
}

/// The external payload producer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce a payload for the given prompt. Errors are caught at the
    /// session boundary and surfaced as a single apology message.
    async fn generate(&self, prompt: &str, ctx: &BackendContext)
        -> SessionResult<AssistantPayload>;
}
