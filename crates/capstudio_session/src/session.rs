//! Workspace session: conversation state and the turn pipeline.
//!
//! One session owns the project tree, the output log, the conversation
//! history and the run-state flag. Collaborators only dispatch intents and
//! read cloned projections; nothing outside this crate mutates the state
//! directly.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use capstudio_parse::{extract_file_specs, extract_interactive_plan, InteractivePlan};
use capstudio_tree::{FileSystemNode, ProjectTree};

use crate::backend::{AssistantPayload, BackendContext, GenerationBackend};
use crate::config::SessionConfig;
use crate::detect;
use crate::error::{SessionError, SessionResult};
use crate::orchestrator::DEFAULT_FOLLOWUP_COMMANDS;
use crate::plan;
use crate::scaffold::{self, ProjectTemplate};
use crate::types::{ConversationMode, GenerationProgress, Message, PLAN_SENTINEL};

/// Assistant message used when the generation collaborator fails.
pub(crate) const APOLOGY: &str =
    "Sorry, I encountered an error while generating the response. Please try again.";

/// Everything a workspace session owns.
pub(crate) struct SessionState {
    pub project: String,
    pub tree: ProjectTree,
    pub active_file: Option<String>,
    pub output: Vec<String>,
    pub history: Vec<Message>,
    pub is_running: bool,
    pub mode: ConversationMode,
    pub active_plan: Option<InteractivePlan>,
    pub progress: Option<GenerationProgress>,
}

impl SessionState {
    fn new(project: String) -> Self {
        Self {
            project,
            tree: ProjectTree::new(),
            active_file: None,
            output: Vec::new(),
            history: Vec::new(),
            is_running: false,
            mode: ConversationMode::AwaitingPlan,
            active_plan: None,
            progress: None,
        }
    }
}

/// An interactive project-building session.
#[derive(Clone)]
pub struct WorkspaceSession {
    pub(crate) state: Arc<RwLock<SessionState>>,
    pub(crate) backend: Arc<dyn GenerationBackend>,
    pub(crate) config: SessionConfig,
}

impl WorkspaceSession {
    /// Create an empty session for a named project.
    pub fn new(
        project: impl Into<String>,
        backend: Arc<dyn GenerationBackend>,
        config: SessionConfig,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::new(project.into()))),
            backend,
            config,
        }
    }

    /// Seed the session with a starter project: template files, welcome
    /// message, startup output and a running server.
    pub async fn create_project(&self, template: ProjectTemplate) {
        let mut s = self.state.write().await;
        info!(project = %s.project, ?template, "scaffolding project");
        s.tree = scaffold::starter_tree(&s.project, template);
        s.active_file = Some(scaffold::DEFAULT_ACTIVE_FILE.to_string());
        s.output = scaffold::startup_output();
        s.history = vec![Message::assistant(scaffold::welcome_message(&s.project))];
        s.is_running = true;
        s.mode = ConversationMode::AwaitingPlan;
    }

    /// Handle one user turn: append the message, then either propose a plan
    /// (first turn) or drive a generation.
    pub async fn user_turn(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        {
            let mut s = self.state.write().await;
            // a new turn dismisses whatever progress card was still showing
            s.progress = None;
            s.history.push(Message::user(text));
        }
        self.generate_turn(text).await;
    }

    /// Toggle one option on the active plan. No-op without a plan.
    pub async fn plan_toggle(&self, section_index: usize, option_id: &str) {
        let mut s = self.state.write().await;
        if let Some(active) = s.active_plan.as_mut() {
            active.toggle(section_index, option_id);
        }
    }

    /// Confirm the active plan: the checked options become a synthesized
    /// follow-up prompt and generation begins.
    pub async fn plan_confirm(&self) -> SessionResult<()> {
        let prompt = {
            let mut s = self.state.write().await;
            let active = s.active_plan.take().ok_or(SessionError::NoActivePlan)?;
            s.mode = ConversationMode::Generating;
            s.progress = None;
            plan::confirm_prompt(&active)
        };
        info!("plan confirmed, starting development");
        self.generate_turn(&prompt).await;
        Ok(())
    }

    /// Offer a detected error back to the assistant as an ordinary turn.
    pub async fn resolve_error(&self, error_line: &str) {
        self.user_turn(&detect::resolve_prompt(error_line)).await;
    }

    /// Drop the current progress card.
    pub async fn dismiss_progress(&self) {
        self.state.write().await.progress = None;
    }

    // ---- file intents (explorer/editor dispatch) ----

    /// Replace the content of an existing file.
    pub async fn set_file_content(&self, file_path: &str, content: &str) {
        self.state.write().await.tree.set_content_at(file_path, content);
    }

    /// Delete a node and its subtree.
    pub async fn delete_path(&self, target: &str) {
        let mut s = self.state.write().await;
        s.tree.delete_at(target);
        if s.active_file.as_deref() == Some(target) {
            s.active_file = None;
        }
    }

    /// Toggle a folder's expansion flag.
    pub async fn toggle_folder(&self, target: &str) {
        self.state.write().await.tree.toggle_folder(target);
    }

    /// Select the file shown in the editor. No-op unless the path names an
    /// existing file.
    pub async fn set_active_file(&self, file_path: &str) {
        let mut s = self.state.write().await;
        if s.tree.find_by_path(file_path).is_some_and(|n| n.is_file()) {
            s.active_file = Some(file_path.to_string());
        }
    }

    // ---- read-only projections ----

    /// Current project tree.
    pub async fn tree(&self) -> ProjectTree {
        self.state.read().await.tree.clone()
    }

    /// Conversation history.
    pub async fn history(&self) -> Vec<Message> {
        self.state.read().await.history.clone()
    }

    /// Output log.
    pub async fn output(&self) -> Vec<String> {
        self.state.read().await.output.clone()
    }

    /// Current generation progress, if a run is live or recently finished.
    pub async fn progress(&self) -> Option<GenerationProgress> {
        self.state.read().await.progress.clone()
    }

    /// Whether the simulated server is running.
    pub async fn is_running(&self) -> bool {
        self.state.read().await.is_running
    }

    /// The active interactive plan, if one is awaiting confirmation.
    pub async fn active_plan(&self) -> Option<InteractivePlan> {
        self.state.read().await.active_plan.clone()
    }

    /// Current conversation mode.
    pub async fn mode(&self) -> ConversationMode {
        self.state.read().await.mode
    }

    /// Path of the file open in the editor.
    pub async fn active_file(&self) -> Option<String> {
        self.state.read().await.active_file.clone()
    }

    /// Project name.
    pub async fn project_name(&self) -> String {
        self.state.read().await.project.clone()
    }

    /// Failure lines currently offered for remediation.
    pub async fn detected_errors(&self) -> Vec<String> {
        detect::detect(&self.state.read().await.output)
    }

    // ---- internals ----

    /// Ask the backend for a payload and route the result.
    async fn generate_turn(&self, prompt: &str) {
        let (ctx, first_turn) = {
            let s = self.state.read().await;
            (backend_context(&s), s.mode == ConversationMode::AwaitingPlan)
        };

        match self.backend.generate(prompt, &ctx).await {
            Err(e) => {
                warn!(error = %e, "generation backend failed");
                let mut s = self.state.write().await;
                s.history.push(Message::assistant(APOLOGY));
            }
            Ok(AssistantPayload::Plan(proposed)) => {
                self.activate_plan(proposed).await;
            }
            Ok(AssistantPayload::Text(text)) => {
                if first_turn {
                    if let Some(proposed) = extract_interactive_plan(&text) {
                        debug!("recovered interactive plan from text payload");
                        self.activate_plan(proposed).await;
                        return;
                    }
                }

                {
                    let mut s = self.state.write().await;
                    s.mode = ConversationMode::Generating;
                    s.history.push(Message::assistant(text.clone()));
                }
                let extraction = extract_file_specs(&text);
                if extraction.specs.is_empty() {
                    // pure-text assistant message, a normal outcome
                    return;
                }
                self.update_last_assistant(extraction.summary.clone()).await;
                self.run_generation(
                    extraction.specs,
                    DEFAULT_FOLLOWUP_COMMANDS.iter().map(|c| c.to_string()).collect(),
                )
                .await;
            }
        }
    }

    async fn activate_plan(&self, proposed: InteractivePlan) {
        let mut s = self.state.write().await;
        s.active_plan = Some(proposed);
        s.history.push(Message::assistant(PLAN_SENTINEL));
    }

    /// Append one line to the output log.
    pub(crate) async fn append_output(&self, line: impl Into<String>) {
        self.state.write().await.output.push(line.into());
    }

    /// Rewrite the content of the most recent assistant message in place.
    async fn update_last_assistant(&self, content: String) {
        let mut s = self.state.write().await;
        if let Some(message) = s
            .history
            .iter_mut()
            .rev()
            .find(|m| m.role == crate::types::MessageRole::Assistant)
        {
            message.content = content;
        }
    }
}

/// Render the read-only context handed to the generation backend.
fn backend_context(s: &SessionState) -> BackendContext {
    let mut listing = String::new();
    collect_file_listing(s.tree.roots(), &mut listing);
    BackendContext {
        project: s.project.clone(),
        files_listing: listing,
        first_turn: s.mode == ConversationMode::AwaitingPlan,
    }
}

fn collect_file_listing(nodes: &[FileSystemNode], out: &mut String) {
    for node in nodes {
        if node.is_file() {
            if let Some(content) = node.content.as_deref() {
                if !content.is_empty() {
                    out.push_str("File: ");
                    out.push_str(&node.path);
                    out.push('\n');
                    out.push_str(content);
                    out.push_str("\n\n");
                }
            }
        }
        collect_file_listing(&node.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::types::MessageRole;

    /// Backend returning a fixed text payload.
    struct TextBackend(&'static str);

    #[async_trait]
    impl GenerationBackend for TextBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _ctx: &BackendContext,
        ) -> SessionResult<AssistantPayload> {
            Ok(AssistantPayload::Text(self.0.to_string()))
        }
    }

    /// Backend that always fails.
    struct FailingBackend;

    #[async_trait]
    impl GenerationBackend for FailingBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _ctx: &BackendContext,
        ) -> SessionResult<AssistantPayload> {
            Err(SessionError::Backend("upstream unavailable".into()))
        }
    }

    /// Backend returning the default plan on the planning turn, canned text
    /// afterwards.
    struct PlanningBackend(&'static str);

    #[async_trait]
    impl GenerationBackend for PlanningBackend {
        async fn generate(
            &self,
            prompt: &str,
            ctx: &BackendContext,
        ) -> SessionResult<AssistantPayload> {
            if ctx.first_turn {
                Ok(AssistantPayload::Plan(plan::default_plan(prompt)))
            } else {
                Ok(AssistantPayload::Text(self.0.to_string()))
            }
        }
    }

    fn session(backend: Arc<dyn GenerationBackend>) -> WorkspaceSession {
        WorkspaceSession::new("demo", backend, SessionConfig::instant())
    }

    #[tokio::test]
    async fn test_first_turn_yields_plan_sentinel() {
        let ws = session(Arc::new(PlanningBackend("unused")));
        ws.user_turn("build a book shop").await;

        let history = ws.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, PLAN_SENTINEL);
        assert!(ws.active_plan().await.is_some());
        assert_eq!(ws.mode().await, ConversationMode::AwaitingPlan);
    }

    #[tokio::test]
    async fn test_plan_confirm_drives_generation() {
        const RESPONSE: &str =
            "Here we go!\n\n```cds /db/schema.cds\nentity Book { key ID: UUID; }\n```";
        let ws = session(Arc::new(PlanningBackend(RESPONSE)));
        ws.user_turn("build a book shop").await;
        ws.plan_confirm().await.unwrap();

        assert_eq!(ws.mode().await, ConversationMode::Generating);
        assert!(ws.active_plan().await.is_none());

        let node = ws.tree().await.find_by_path("/db/schema.cds").cloned().unwrap();
        assert_eq!(node.content.as_deref(), Some("entity Book { key ID: UUID; }"));

        // the assistant message was rewritten to the cleaned summary
        let history = ws.history().await;
        let last = history.last().unwrap();
        assert!(!last.content.contains("```"));
        assert!(last.content.contains("Generated 1 files"));
    }

    #[tokio::test]
    async fn test_confirm_without_plan_is_an_error() {
        let ws = session(Arc::new(TextBackend("hello")));
        assert!(matches!(
            ws.plan_confirm().await,
            Err(SessionError::NoActivePlan)
        ));
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_apology() {
        let ws = session(Arc::new(FailingBackend));
        ws.user_turn("build something").await;

        let history = ws.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, APOLOGY);
        assert!(ws.progress().await.is_none());
    }

    #[tokio::test]
    async fn test_plain_text_payload_is_a_normal_message() {
        let ws = session(Arc::new(TextBackend("Happy to explain CAP services.")));
        // first turn: the text payload is not a plan, so the session falls
        // through to ordinary handling and flips to Generating
        ws.user_turn("what is CAP?").await;
        let history = ws.history().await;
        assert_eq!(history[1].content, "Happy to explain CAP services.");
        assert_eq!(ws.mode().await, ConversationMode::Generating);
        assert!(ws.progress().await.is_none());
    }

    #[tokio::test]
    async fn test_scaffolded_project() {
        let ws = session(Arc::new(TextBackend("x")));
        ws.create_project(ProjectTemplate::Basic).await;

        assert!(ws.is_running().await);
        assert_eq!(ws.active_file().await.as_deref(), Some("/db/schema.cds"));
        assert!(ws.tree().await.find_by_path("/package.json").is_some());
        let history = ws.history().await;
        assert_eq!(history.len(), 1);
        assert!(history[0].content.starts_with("Welcome to your new CAPM project"));
    }

    #[tokio::test]
    async fn test_file_intents() {
        let ws = session(Arc::new(TextBackend("x")));
        ws.create_project(ProjectTemplate::Basic).await;

        ws.set_file_content("/README.md", "rewritten").await;
        assert_eq!(
            ws.tree().await.find_by_path("/README.md").unwrap().content.as_deref(),
            Some("rewritten")
        );

        ws.set_active_file("/README.md").await;
        assert_eq!(ws.active_file().await.as_deref(), Some("/README.md"));

        ws.delete_path("/README.md").await;
        assert!(ws.tree().await.find_by_path("/README.md").is_none());
        assert!(ws.active_file().await.is_none());

        // folder paths are not selectable
        ws.set_active_file("/db").await;
        assert!(ws.active_file().await.is_none());
    }
}
