//! # capstudio_session - Workspace session for CAPM Studio
//!
//! This crate ties the tree engine and the response parser together into an
//! interactive project-building session:
//! - Conversation state with an explicit planning/generating mode
//! - Generation orchestration: parsed file specs become tree mutations with
//!   observable, phased progress
//! - A simulated terminal over the virtual tree
//! - Error detection over the output log, feeding remediation prompts back
//!   into the conversation
//! - Starter-project scaffolding
//!
//! The session runs on a single cooperative scheduling model: state lives
//! behind one async lock, every mutation is a short atomic step, and paced
//! delays yield control so the surface stays responsive.

pub mod backend;
pub mod command;
pub mod config;
pub mod detect;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod scaffold;
pub mod session;
pub mod types;

pub use backend::{AssistantPayload, BackendContext, GenerationBackend};
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use plan::default_plan;
pub use scaffold::ProjectTemplate;
pub use session::WorkspaceSession;
pub use types::{
    ConversationMode, FileStatus, GenerationPhase, GenerationProgress, Message, MessageRole,
    PendingFile, PLAN_SENTINEL,
};
