//! JSON snapshot of a survey.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use super::{Survey, SurveyRecord};

/// Survey export structure
#[derive(Debug, Clone, Serialize)]
pub struct SurveyExport {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Simulation day the survey was taken
    pub survey_day: i32,
    pub records: Vec<SurveyRecord>,
}

fn build_export(survey: &Survey, survey_day: i32) -> SurveyExport {
    SurveyExport {
        exported_at: Local::now().to_rfc3339(),
        version: "1.0.0",
        survey_day,
        records: survey.records(),
    }
}

/// Export a survey to `dir/survey_<day>_YYYYMMDD_HHMMSS.json`.
///
/// Creates the directory if it doesn't exist. Returns the file path.
pub fn export_survey_json<P: AsRef<Path>>(survey: &Survey, survey_day: i32, dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let filename = format!(
        "survey_{}_{}.json",
        survey_day,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);
    export_survey_json_to(survey, survey_day, &path)?;
    Ok(path)
}

/// Export a survey to a specific file
pub fn export_survey_json_to<P: AsRef<Path>>(survey: &Survey, survey_day: i32, path: P) -> Result<()> {
    let export = build_export(survey, survey_day);
    let file = std::fs::File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("Survey exported: {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::Measure;

    #[test]
    fn test_export_writes_records() {
        let mut survey = Survey::all_ages();
        survey.add_int(Measure::PatentHosts, 4.0, 1);

        let dir = std::env::temp_dir().join("malaria_host_sim_export_test");
        let path = export_survey_json(&survey, 365, &dir).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["survey_day"], 365);
        assert_eq!(json["records"][0]["measure"], "PatentHosts");
        let _ = std::fs::remove_file(&path);
    }
}
