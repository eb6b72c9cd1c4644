//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod chat;
pub mod extract;

/// CAPM Studio - interactive project-building workspace
#[derive(Parser)]
#[command(name = "capstudio")]
#[command(version, about = "CAPM Studio - interactive project-building workspace")]
#[command(long_about = r#"
CAPM Studio turns assistant responses into an inspectable project tree.
Describe an application in natural language, curate the proposed feature
plan, and watch the workspace materialize files, run simulated commands and
surface errors for remediation.

COMMANDS:
  chat     → Interactive workspace session (offline backend)
  extract  → Extract file specs from a saved assistant response

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive workspace session
    Chat(chat::ChatArgs),

    /// Extract file specs from a response file and print them
    Extract(extract::ExtractArgs),
}
