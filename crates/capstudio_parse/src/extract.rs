//! File spec extraction from fenced code regions.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// One file to materialize, extracted from a fenced region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// Absolute `/`-prefixed target path
    pub path: String,
    /// Language tag from the fence-open line, if any
    pub language: Option<String>,
    /// Trimmed file body
    pub content: String,
}

/// Result of scanning a response for file specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// File specs in the order they appear in the response
    pub specs: Vec<FileSpec>,
    /// The response with file-spec regions removed and a generation footer
    /// appended when any spec was found
    pub summary: String,
}

/// Fenced region: ```[lang ][/path]\n body ```
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:([A-Za-z0-9_#+.-]+)[ \t]+)?(/[^\n]+)?\n((?s:.*?))```")
            .expect("fence regex")
    })
}

fn blank_run_regex() -> &'static Regex {
    static BLANKS: OnceLock<Regex> = OnceLock::new();
    BLANKS.get_or_init(|| Regex::new(r"\n\s*\n\s*\n").expect("blank-run regex"))
}

/// Extract `(path, content)` file specs from `text`.
///
/// A fenced region is treated as a file spec only when its open line carries
/// a `/`-prefixed path token; regions without one are ordinary code
/// illustration and stay in the summary untouched. Regions with a path token
/// are removed from the summary even when their body is blank, but only
/// non-empty bodies yield specs.
pub fn extract_file_specs(text: &str) -> Extraction {
    let mut specs = Vec::new();
    let mut summary = String::with_capacity(text.len());
    let mut cursor = 0;

    for caps in fence_regex().captures_iter(text) {
        let whole = caps.get(0).expect("match");
        let Some(path_token) = caps.get(2) else {
            // plain illustration block, keep it
            continue;
        };

        summary.push_str(&text[cursor..whole.start()]);
        cursor = whole.end();

        let body = caps.get(3).map(|m| m.as_str()).unwrap_or("").trim();
        if body.is_empty() {
            debug!(path = path_token.as_str(), "skipping empty file region");
            continue;
        }
        specs.push(FileSpec {
            path: path_token.as_str().trim().to_string(),
            language: caps.get(1).map(|m| m.as_str().to_string()),
            content: body.to_string(),
        });
    }
    summary.push_str(&text[cursor..]);

    let mut summary = blank_run_regex()
        .replace_all(summary.trim(), "\n\n")
        .into_owned();

    if !specs.is_empty() {
        summary.push_str(&format!(
            "\n\n✅ **Generated {} files** for your application.\n\n\
             🚀 **What's happening:**\n\
             • Creating project structure\n\
             • Installing dependencies\n\
             • Starting development server\n\n\
             Check the Preview tab once generation is complete!",
            specs.len()
        ));
    }

    Extraction { specs, summary }
}
