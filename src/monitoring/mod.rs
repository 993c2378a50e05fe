//! Survey reporting sink.
//!
//! Hosts report into a [`Survey`] when summarised; aggregation across
//! surveys and output formatting beyond a JSON snapshot are left to callers.

mod json_export;
mod survey;

pub use json_export::{export_survey_json, export_survey_json_to};
pub use survey::{Measure, Survey, SurveyRecord};
