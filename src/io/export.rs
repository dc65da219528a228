//! Export the run report to JSON.
//!
//! The export is meant to be easy to consume from notebooks or grading
//! scripts without parsing the terminal output.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::report::RunReport;

/// Write the run report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &RunReport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create report JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarParams;

    #[test]
    fn report_json_round_trips_key_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = RunReport {
            params: StarParams {
                mass: 1.5,
                metallicity: 0.02,
            },
            mass_literal: "1.50".to_string(),
            z_literal: "0.02d0".to_string(),
            mesa_version: "15140".to_string(),
            files: vec![],
            clean: None,
            launched: false,
        };
        write_report_json(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mass_literal"], "1.50");
        assert_eq!(value["z_literal"], "0.02d0");
        assert_eq!(value["mesa_version"], "15140");
        assert_eq!(value["params"]["mass"], 1.5);
    }
}
