//! Chat command - interactive workspace session.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use capstudio_parse::InteractivePlan;
use capstudio_tree::FileSystemNode;
use capstudio_session::{
    FileStatus, GenerationPhase, Message, MessageRole, ProjectTemplate, SessionConfig,
    WorkspaceSession, PLAN_SENTINEL,
};

use crate::backend::OfflineBackend;

#[derive(Args)]
pub struct ChatArgs {
    /// Project name
    #[arg(short, long, default_value = "my-app")]
    project: String,

    /// Starter template: basic, empty or none
    #[arg(short, long, default_value = "basic")]
    template: String,
}

const REPL_HELP: &str = "Commands:\n\
  !<command>            run a terminal command (e.g. !ls, !npm start)\n\
  :tree                 show the project tree\n\
  :plan                 show the active feature plan\n\
  :toggle <sec> <id>    toggle a plan option (e.g. :toggle 2 auth)\n\
  :confirm              confirm the plan and start development\n\
  :log                  show the output log\n\
  :errors               show detected errors\n\
  :resolve <n>          send error n back for remediation\n\
  :help                 this help\n\
  :quit                 leave the studio\n\
Anything else is sent to the assistant.";

pub async fn execute(args: ChatArgs) -> Result<()> {
    let session = WorkspaceSession::new(
        &args.project,
        Arc::new(OfflineBackend),
        SessionConfig::from_env(),
    );

    if args.template != "none" {
        let template: ProjectTemplate = args.template.parse().map_err(anyhow::Error::msg)?;
        session.create_project(template).await;
    }
    info!(project = %args.project, "workspace session started");

    println!("CAPM Studio - project '{}'", args.project);
    println!("Type :help for commands.\n");

    let mut printed_history = 0;
    let mut printed_output = 0;
    print_news(&session, &mut printed_history, &mut printed_output).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("› ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.as_str() {
            ":q" | ":quit" | ":exit" => break,
            ":help" => println!("{}", REPL_HELP),
            ":tree" => print_nodes(session.tree().await.roots(), 0),
            ":plan" => match session.active_plan().await {
                Some(active) => print_plan(&active),
                None => println!("(no active plan)"),
            },
            ":confirm" => match session.plan_confirm().await {
                Ok(()) => print_news(&session, &mut printed_history, &mut printed_output).await,
                Err(e) => println!("{}", e),
            },
            ":log" => {
                for entry in session.output().await {
                    println!("{}", entry);
                }
                printed_output = session.output().await.len();
            }
            ":errors" => {
                let errors = session.detected_errors().await;
                if errors.is_empty() {
                    println!("(no errors detected)");
                }
                for (index, error) in errors.iter().enumerate() {
                    println!("[{}] {}", index, error);
                }
            }
            _ if line.starts_with(":resolve") => {
                let errors = session.detected_errors().await;
                let index: usize = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(0);
                match errors.get(index) {
                    Some(error) => {
                        session.resolve_error(error).await;
                        print_news(&session, &mut printed_history, &mut printed_output).await;
                    }
                    None => println!("(no such error)"),
                }
            }
            _ if line.starts_with(":toggle") => {
                let mut parts = line.split_whitespace().skip(1);
                match (
                    parts.next().and_then(|s| s.parse::<usize>().ok()),
                    parts.next(),
                ) {
                    (Some(section), Some(option_id)) => {
                        session.plan_toggle(section, option_id).await;
                        match session.active_plan().await {
                            Some(active) => print_plan(&active),
                            None => println!("(no active plan)"),
                        }
                    }
                    _ => println!("usage: :toggle <section> <option-id>"),
                }
            }
            _ if line.starts_with('!') => {
                session.terminal_command(line.trim_start_matches('!').trim()).await;
                print_news(&session, &mut printed_history, &mut printed_output).await;
            }
            _ => {
                session.user_turn(&line).await;
                print_news(&session, &mut printed_history, &mut printed_output).await;
            }
        }
    }

    println!("Bye!");
    Ok(())
}

/// Print everything that happened since the last prompt: new messages, the
/// progress card, new output lines.
async fn print_news(
    session: &WorkspaceSession,
    printed_history: &mut usize,
    printed_output: &mut usize,
) {
    let history = session.history().await;
    for message in &history[*printed_history..] {
        print_message(session, message).await;
    }
    *printed_history = history.len();

    if let Some(progress) = session.progress().await {
        let done = progress.completed_files();
        println!("── {} ({}/{} files)", progress.message, done, progress.pending_files.len());
        for file in &progress.pending_files {
            let glyph = match file.status {
                FileStatus::Complete => "✅",
                FileStatus::Creating => "⏳",
                FileStatus::Pending => "·",
            };
            println!("   {} {}", glyph, file.path);
        }
        if progress.phase == GenerationPhase::Complete {
            println!("   done.");
        }
    }

    let output = session.output().await;
    if output.len() > *printed_output {
        for entry in &output[*printed_output..] {
            println!("{}", entry);
        }
    }
    *printed_output = output.len();
}

async fn print_message(session: &WorkspaceSession, message: &Message) {
    let prefix = match message.role {
        MessageRole::User => "🧑",
        MessageRole::Assistant => "🤖",
    };
    if message.content == PLAN_SENTINEL {
        if let Some(active) = session.active_plan().await {
            println!("{} proposed a plan:", prefix);
            print_plan(&active);
        }
        return;
    }
    println!("{} {}", prefix, message.content);
}

fn print_nodes(nodes: &[FileSystemNode], depth: usize) {
    for node in nodes {
        let suffix = if node.is_folder() { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(depth), node.name, suffix);
        print_nodes(&node.children, depth + 1);
    }
}

fn print_plan(active: &InteractivePlan) {
    println!("┌ {}", active.title);
    println!("│ {}", active.description);
    for (section_index, section) in active.sections.iter().enumerate() {
        println!("│ [{}] {} {}", section_index, section.emoji, section.title);
        for option in &section.options {
            let mark = if option.selected { "x" } else { " " };
            println!("│   [{}] {:<14} {}", mark, option.id, option.label);
        }
    }
    println!("└ :toggle <section> <option-id> to adjust, :confirm to build");
}
