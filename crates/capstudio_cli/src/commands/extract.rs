//! Extract command - parse a saved assistant response.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use capstudio_parse::extract_file_specs;

#[derive(Args)]
pub struct ExtractArgs {
    /// Response file to parse
    file: PathBuf,

    /// Print the cleaned summary as well
    #[arg(short, long)]
    summary: bool,
}

pub async fn execute(args: ExtractArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {:?}", args.file))?;

    let extraction = extract_file_specs(&text);

    if extraction.specs.is_empty() {
        println!("No file specs found.");
    } else {
        println!("{} file spec(s):", extraction.specs.len());
        for spec in &extraction.specs {
            println!(
                "  {} ({} lines{})",
                spec.path,
                spec.content.lines().count(),
                spec.language
                    .as_deref()
                    .map(|l| format!(", {}", l))
                    .unwrap_or_default()
            );
        }
    }

    if args.summary {
        println!("\n--- summary ---\n{}", extraction.summary);
    }

    Ok(())
}
