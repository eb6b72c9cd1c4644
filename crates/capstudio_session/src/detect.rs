//! Error detection over the output log.
//!
//! The detector never handles anything itself: matching lines are offered to
//! the user, and a "resolved" error re-enters the conversation as an
//! ordinary user prompt.

/// Distinguished failure glyph emitted by the command simulator.
pub const FAILURE_GLYPH: char = '✘';

/// Whether a single log line looks like a failure.
pub fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("error")
        || lower.contains("failed")
        || lower.contains("cannot")
        || line.contains(FAILURE_GLYPH)
}

/// Scan the output log for failure signatures.
///
/// Returns at most the 3 most recent matches, oldest first.
pub fn detect(output: &[String]) -> Vec<String> {
    let matches: Vec<&String> = output.iter().filter(|l| is_error_line(l)).collect();
    let skip = matches.len().saturating_sub(3);
    matches.into_iter().skip(skip).cloned().collect()
}

/// Wrap a detected error line into a remediation prompt.
pub fn resolve_prompt(error_line: &str) -> String {
    format!(
        "I'm getting this error in my CAPM project:\n\n{}\n\n\
         Please help me fix this error. Provide the exact solution and any code changes needed.",
        error_line
    )
}
