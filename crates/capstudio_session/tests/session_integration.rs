//! End-to-end tests for the workspace session.

use std::sync::Arc;

use async_trait::async_trait;

use capstudio_session::{
    default_plan, AssistantPayload, BackendContext, ConversationMode, GenerationBackend,
    GenerationPhase, MessageRole, ProjectTemplate, SessionConfig, SessionResult, WorkspaceSession,
    PLAN_SENTINEL,
};

const BOOKSHOP_RESPONSE: &str = r#"I'll create a book management application for you!

```cds /db/schema.cds
namespace bookshop;

entity Book {
  key ID: UUID;
  title: String(100) @mandatory;
}
```

```cds /srv/service.cds
using bookshop as db from '../db/schema';

service CatalogService {
  entity Books as projection on db.Book;
}
```

Check the files and let me know what to adjust!"#;

/// Offline backend: a plan on the planning turn, a canned bookshop response
/// afterwards.
struct ScriptedBackend;

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        prompt: &str,
        ctx: &BackendContext,
    ) -> SessionResult<AssistantPayload> {
        if ctx.first_turn {
            Ok(AssistantPayload::Plan(default_plan(prompt)))
        } else {
            Ok(AssistantPayload::Text(BOOKSHOP_RESPONSE.to_string()))
        }
    }
}

fn new_session() -> WorkspaceSession {
    WorkspaceSession::new("bookshop", Arc::new(ScriptedBackend), SessionConfig::instant())
}

/// Full happy path: scaffold, plan, confirm, generate, inspect, detect.
#[tokio::test]
async fn test_full_project_building_flow() {
    let ws = new_session();
    ws.create_project(ProjectTemplate::Empty).await;
    assert_eq!(ws.mode().await, ConversationMode::AwaitingPlan);

    // First user turn proposes a plan instead of generating.
    ws.user_turn("build a book management app").await;
    let proposed = ws.active_plan().await.expect("plan should be active");
    assert_eq!(proposed.message, "build a book management app");
    assert_eq!(ws.history().await.last().unwrap().content, PLAN_SENTINEL);

    // Curate and confirm.
    ws.plan_toggle(2, "auth").await;
    ws.plan_confirm().await.unwrap();
    assert_eq!(ws.mode().await, ConversationMode::Generating);
    assert!(ws.active_plan().await.is_none());

    // Both files were materialized, replacing the scaffold schema.
    let tree = ws.tree().await;
    let schema = tree.find_by_path("/db/schema.cds").unwrap();
    assert!(schema.content.as_deref().unwrap().contains("entity Book"));
    assert!(tree.find_by_path("/srv/service.cds").is_some());

    // Progress ran to completion and the follow-up commands executed.
    let progress = ws.progress().await.unwrap();
    assert_eq!(progress.phase, GenerationPhase::Complete);
    assert_eq!(progress.completed_files(), 2);
    assert_eq!(progress.commands, vec!["npm install", "npm start"]);

    let output = ws.output().await;
    assert!(output.contains(&"$ npm install".to_string()));
    assert!(output.contains(&"$ npm start".to_string()));
    assert!(ws.is_running().await);

    // The summary replaced the raw response in history.
    let history = ws.history().await;
    let last = history.last().unwrap();
    assert_eq!(last.role, MessageRole::Assistant);
    assert!(!last.content.contains("```"));
    assert!(last.content.contains("Generated 2 files"));
}

/// A later user turn generates directly, without a plan round.
#[tokio::test]
async fn test_followup_turn_generates_directly() {
    let ws = new_session();
    ws.user_turn("build a book app").await;
    ws.plan_confirm().await.unwrap();

    let turns_before = ws.history().await.len();
    ws.user_turn("add an author entity").await;

    // one user + one assistant message, no new plan
    assert_eq!(ws.history().await.len(), turns_before + 2);
    assert!(ws.active_plan().await.is_none());
    assert_eq!(ws.progress().await.unwrap().phase, GenerationPhase::Complete);
}

/// Detected errors loop back into the conversation as ordinary turns.
#[tokio::test]
async fn test_error_remediation_loop() {
    let ws = new_session();
    ws.user_turn("build a book app").await;
    ws.plan_confirm().await.unwrap();

    ws.terminal_command("frobnicate").await;
    let errors = ws.detected_errors().await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("command not found"));

    let turns_before = ws.history().await.len();
    ws.resolve_error(&errors[0]).await;

    let history = ws.history().await;
    assert_eq!(history.len(), turns_before + 2);
    let remediation = &history[turns_before];
    assert_eq!(remediation.role, MessageRole::User);
    assert!(remediation.content.contains("command not found"));
    assert!(remediation.content.starts_with("I'm getting this error"));
}

/// Tree mutations from a terminal-facing collaborator interleave safely
/// with projections.
#[tokio::test]
async fn test_user_edits_after_generation() {
    let ws = new_session();
    ws.user_turn("build a book app").await;
    ws.plan_confirm().await.unwrap();

    ws.set_file_content("/db/schema.cds", "namespace rewritten;").await;
    ws.terminal_command("cat /db/schema.cds").await;
    assert_eq!(ws.output().await.last().unwrap(), "namespace rewritten;");

    ws.delete_path("/srv").await;
    assert!(ws.tree().await.find_by_path("/srv/service.cds").is_none());

    // stale reference: deleting again is a silent no-op
    ws.delete_path("/srv").await;
}

/// Dismissing progress clears the card without touching the tree.
#[tokio::test]
async fn test_dismiss_progress_keeps_tree() {
    let ws = new_session();
    ws.user_turn("build a book app").await;
    ws.plan_confirm().await.unwrap();

    assert!(ws.progress().await.is_some());
    ws.dismiss_progress().await;
    assert!(ws.progress().await.is_none());
    assert!(ws.tree().await.find_by_path("/db/schema.cds").is_some());
}
