//! Interactive plan recovery.
//!
//! Before the first real generation the assistant proposes a feature
//! checklist. Upstream may deliver it as an already-structured object or as
//! JSON embedded in the response text; this module handles the textual case.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Payload type discriminator used on the wire.
pub const PLAN_PAYLOAD_TYPE: &str = "interactive-plan";

/// One selectable feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanOption {
    /// Stable option ID
    pub id: String,
    /// Display label; also the text used when synthesizing the follow-up
    /// prompt
    pub label: String,
    /// Whether the user has this option checked
    pub selected: bool,
}

/// A titled group of options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSection {
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    pub options: Vec<PlanOption>,
}

/// A pre-generation feature checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractivePlan {
    /// The user request this plan answers
    pub message: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<PlanSection>,
}

impl InteractivePlan {
    /// Toggle one option. No-op when the section or option does not exist.
    pub fn toggle(&mut self, section_index: usize, option_id: &str) {
        if let Some(section) = self.sections.get_mut(section_index) {
            if let Some(option) = section.options.iter_mut().find(|o| o.id == option_id) {
                option.selected = !option.selected;
            }
        }
    }

    /// Labels of every selected option, in section order.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.options.iter())
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect()
    }
}

/// Wire envelope: `{ "type": "interactive-plan", "message": …, "plan": … }`
#[derive(Deserialize)]
struct PlanEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
    plan: PlanBody,
}

#[derive(Deserialize)]
struct PlanBody {
    title: String,
    description: String,
    sections: Vec<PlanSection>,
}

fn fenced_json_regex() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| Regex::new(r"```(?:json)?[ \t]*\n?((?s:.*?))\n?```").expect("json fence"))
}

fn bare_object_regex() -> &'static Regex {
    static BARE: OnceLock<Regex> = OnceLock::new();
    BARE.get_or_init(|| {
        Regex::new(r#"(?s)\{.*"type"\s*:\s*"interactive-plan".*\}"#).expect("bare plan object")
    })
}

/// Try to recover a structured plan from `text`.
///
/// Looks inside a fenced block first, then for a bare JSON object carrying
/// the plan discriminator. Returns `None` when neither decodes, so callers
/// fall back to treating the payload as plain text.
pub fn extract_interactive_plan(text: &str) -> Option<InteractivePlan> {
    let trimmed = text.trim();

    let candidate = fenced_json_regex()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| {
            bare_object_regex()
                .find(trimmed)
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_else(|| trimmed.to_string());

    match serde_json::from_str::<PlanEnvelope>(&candidate) {
        Ok(envelope) if envelope.kind == PLAN_PAYLOAD_TYPE => Some(InteractivePlan {
            message: envelope.message,
            title: envelope.plan.title,
            description: envelope.plan.description,
            sections: envelope.plan.sections,
        }),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "payload is not an interactive plan");
            None
        }
    }
}
