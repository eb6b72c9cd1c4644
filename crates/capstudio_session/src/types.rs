//! Core types for the workspace session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use capstudio_parse::FileSpec;

/// History content marking "this message renders the active interactive
/// plan" rather than literal text. The renderer resolves it against the
/// session's active plan, never against history.
pub const PLAN_SENTINEL: &str = "$$INTERACTIVE_PLAN$$";

/// Message role in the conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message ID (UUID)
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Message content
    pub content: String,
    /// When the message was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Conversation mode.
///
/// The session starts in `AwaitingPlan`; the first ordinary payload or a
/// plan confirmation transitions it to `Generating` for good. The mode is
/// carried explicitly rather than recomputed from history length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConversationMode {
    /// No real generation yet; the next turn proposes an interactive plan
    AwaitingPlan,
    /// Ordinary free-text generation turns
    Generating,
}

/// Status of one file inside a generation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Creating,
    Complete,
}

/// Phase of a generation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPhase {
    Planning,
    Generating,
    Installing,
    Complete,
}

/// One file scheduled for materialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingFile {
    pub path: String,
    pub status: FileStatus,
    pub content: String,
}

/// Observable state of one generation run.
///
/// Created when a payload yields at least one file spec; mutated in place as
/// files transition Pending → Creating → Complete; discarded when dismissed
/// or superseded by a newer run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationProgress {
    /// Identity of this run; a stale run recognizes supersession by
    /// comparing against the session's current run ID
    #[serde(rename = "runId")]
    pub run_id: Uuid,
    pub phase: GenerationPhase,
    /// Human-readable banner for the current phase
    pub message: String,
    /// Files in extraction order
    #[serde(rename = "pendingFiles")]
    pub pending_files: Vec<PendingFile>,
    /// Commands scheduled after file materialization
    pub commands: Vec<String>,
}

impl GenerationProgress {
    /// Create a fresh run over the given specs.
    pub fn new(specs: &[FileSpec], commands: Vec<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            phase: GenerationPhase::Generating,
            message: format!("Creating {} files...", specs.len()),
            pending_files: specs
                .iter()
                .map(|s| PendingFile {
                    path: s.path.clone(),
                    status: FileStatus::Pending,
                    content: s.content.clone(),
                })
                .collect(),
            commands,
        }
    }

    /// Number of files already materialized.
    pub fn completed_files(&self) -> usize {
        self.pending_files
            .iter()
            .filter(|f| f.status == FileStatus::Complete)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Build a book shop");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Build a book shop");

        let msg = Message::assistant("On it!");
        assert_eq!(msg.role, MessageRole::Assistant);
    }

    #[test]
    fn test_progress_counts() {
        let specs = vec![
            FileSpec {
                path: "/a.txt".into(),
                language: None,
                content: "a".into(),
            },
            FileSpec {
                path: "/b.txt".into(),
                language: None,
                content: "b".into(),
            },
        ];
        let mut progress = GenerationProgress::new(&specs, vec!["npm install".into()]);
        assert_eq!(progress.phase, GenerationPhase::Generating);
        assert_eq!(progress.completed_files(), 0);
        assert_eq!(progress.message, "Creating 2 files...");

        progress.pending_files[0].status = FileStatus::Complete;
        assert_eq!(progress.completed_files(), 1);
    }
}
