//! Interactive plan synthesis.
//!
//! The planning turn proposes a default feature checklist for the user's
//! request; confirmation converts the checked options back into a natural-
//! language follow-up prompt that drives the first real generation.

use capstudio_parse::{InteractivePlan, PlanOption, PlanSection};

fn option(id: &str, label: &str, selected: bool) -> PlanOption {
    PlanOption {
        id: id.to_string(),
        label: label.to_string(),
        selected,
    }
}

/// Build the default plan for a user request.
pub fn default_plan(request: &str) -> InteractivePlan {
    InteractivePlan {
        message: request.to_string(),
        title: "Let's build your application!".to_string(),
        description: format!("I'll help you create: **{}**", request),
        sections: vec![
            PlanSection {
                title: "Backend Components".to_string(),
                emoji: "🔧".to_string(),
                options: vec![
                    option("entities", "Database entities and relationships", true),
                    option("services", "OData services with CRUD operations", true),
                    option("business-logic", "Business logic and validations", true),
                    option("sample-data", "Sample data for testing", true),
                ],
            },
            PlanSection {
                title: "Frontend Options".to_string(),
                emoji: "🎨".to_string(),
                options: vec![
                    option(
                        "fiori",
                        "Fiori Elements (ListReport + ObjectPage) - Quick setup",
                        true,
                    ),
                    option("sapui5", "Custom SAPUI5 views - Full control", false),
                ],
            },
            PlanSection {
                title: "Additional Features".to_string(),
                emoji: "✨".to_string(),
                options: vec![
                    option("auth", "Authentication and authorization", false),
                    option("search", "Advanced search and filtering", true),
                    option("export", "Export/Import functionality", false),
                    option("workflows", "Custom actions and workflows", false),
                ],
            },
        ],
    }
}

/// Synthesize the follow-up prompt for a confirmed plan.
pub fn confirm_prompt(plan: &InteractivePlan) -> String {
    format!(
        "Start development with these selected features: {}. Build: {}",
        plan.selected_labels().join(", "),
        plan.message
    )
}
