//! # capstudio_parse - Response parsing for CAPM Studio
//!
//! Turns a free-form assistant response into structured data:
//! - [`extract_file_specs`] pulls `(path, content)` file specifications out
//!   of fenced code regions and produces a cleaned human-readable summary
//! - [`extract_interactive_plan`] recovers a structured feature-checklist
//!   plan that was textually encoded inside the response
//!
//! Both entry points are pure and deterministic: the same input always
//! yields the same output.

pub mod extract;
pub mod plan;

pub use extract::{extract_file_specs, Extraction, FileSpec};
pub use plan::{extract_interactive_plan, InteractivePlan, PlanOption, PlanSection};
