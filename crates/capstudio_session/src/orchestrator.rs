//! Generation orchestration.
//!
//! Converts one assistant payload into a sequence of tree mutations and
//! run-state changes with observable, phased progress. Every suspension
//! point re-checks the run's identity against the session's current
//! progress, so a superseding run silently ends the stale one; mutations
//! already applied are kept.

use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use capstudio_parse::FileSpec;
use capstudio_tree::{path, FileSystemNode};

use crate::session::WorkspaceSession;
use crate::types::{FileStatus, GenerationPhase, GenerationProgress};

/// Commands scheduled after every generation run.
pub(crate) const DEFAULT_FOLLOWUP_COMMANDS: [&str; 2] = ["npm install", "npm start"];

impl WorkspaceSession {
    /// Materialize `specs` in extraction order, then run the follow-up
    /// commands.
    pub(crate) async fn run_generation(&self, specs: Vec<FileSpec>, commands: Vec<String>) {
        // empty-after-trim specs never become nodes
        let specs: Vec<FileSpec> = specs
            .into_iter()
            .filter(|s| !s.content.trim().is_empty())
            .collect();
        if specs.is_empty() {
            return;
        }

        let run_id = {
            let mut s = self.state.write().await;
            let progress = GenerationProgress::new(&specs, commands.clone());
            let run_id = progress.run_id;
            s.progress = Some(progress);
            run_id
        };
        info!(files = specs.len(), %run_id, "starting generation run");

        for (index, spec) in specs.iter().enumerate() {
            if !self.set_file_status(run_id, index, FileStatus::Creating).await {
                return;
            }
            sleep(self.config.file_delay).await;
            if self.is_superseded(run_id).await {
                return;
            }

            {
                let mut s = self.state.write().await;
                let file_path = path::normalize(&spec.path);
                let parent = path::parent_path(&file_path);
                if s.tree.find_by_path(&file_path).is_some() {
                    // duplicate paths within one payload: the later spec wins
                    debug!(path = %file_path, "replacing existing node");
                }
                s.tree.ensure_folder_chain(&parent);
                s.tree
                    .upsert_at(FileSystemNode::file(&file_path, spec.content.trim()), &parent);
            }

            if !self.set_file_status(run_id, index, FileStatus::Complete).await {
                return;
            }
        }

        if !self
            .set_phase(
                run_id,
                GenerationPhase::Installing,
                "Installing dependencies and starting server...",
            )
            .await
        {
            return;
        }

        for command in &commands {
            if self.is_superseded(run_id).await {
                return;
            }
            self.terminal_command(command).await;
        }

        self.set_phase(run_id, GenerationPhase::Complete, "Project ready! 🎉")
            .await;
        info!(%run_id, "generation run complete");
    }

    /// Update one file's status if this run still owns the progress object.
    /// Returns false when the run has been superseded.
    async fn set_file_status(&self, run_id: Uuid, index: usize, status: FileStatus) -> bool {
        let mut s = self.state.write().await;
        match s.progress.as_mut() {
            Some(p) if p.run_id == run_id => {
                if let Some(file) = p.pending_files.get_mut(index) {
                    file.status = status;
                }
                true
            }
            _ => {
                debug!(%run_id, "stale generation run, stopping");
                false
            }
        }
    }

    /// Transition the run's phase if it still owns the progress object.
    async fn set_phase(&self, run_id: Uuid, phase: GenerationPhase, message: &str) -> bool {
        let mut s = self.state.write().await;
        match s.progress.as_mut() {
            Some(p) if p.run_id == run_id => {
                p.phase = phase;
                p.message = message.to_string();
                true
            }
            _ => {
                debug!(%run_id, "stale generation run, stopping");
                false
            }
        }
    }

    async fn is_superseded(&self, run_id: Uuid) -> bool {
        self.state
            .read()
            .await
            .progress
            .as_ref()
            .map(|p| p.run_id)
            != Some(run_id)
    }
}
