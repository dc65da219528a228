//! Run summaries and formatted terminal output.
//!
//! Formatting lives in one place so output changes stay localized and the
//! rewrite logic stays testable without string matching.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::StarParams;
use crate::inlist::rewrite::{RuleHit, StagedRewrite};
use crate::io::clean::CleanSummary;

/// Per-file portion of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub replacements: usize,
    pub hits: Vec<RuleHit>,
}

impl From<&StagedRewrite> for FileSummary {
    fn from(staged: &StagedRewrite) -> Self {
        Self {
            path: staged.path.clone(),
            replacements: staged.total(),
            hits: staged.hits.clone(),
        }
    }
}

/// Everything a full `mesaprep update` run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub params: StarParams,
    pub mass_literal: String,
    pub z_literal: String,
    pub mesa_version: String,
    pub files: Vec<FileSummary>,
    pub clean: Option<CleanSummary>,
    pub launched: bool,
}

/// Format the full update summary for the terminal.
pub fn format_update_summary(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str("=== mesaprep - MESA model update ===\n");
    out.push_str(&format!("Initial M: {} Msun\n", report.mass_literal));
    out.push_str(&format!("Initial Z: {}\n", report.z_literal));
    out.push_str(&format!("MESA version: {}\n", report.mesa_version));

    out.push_str(&format!("\nUpdated {} files:\n", report.files.len()));
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());
        out.push_str(&format!("  {name:<24} {} replacements\n", file.replacements));
    }

    if let Some(clean) = &report.clean {
        out.push_str(&format!(
            "\nCleared: {} log files | {} cached files | {} .mod files | {} other\n",
            clean.log_files, clean.cache_files, clean.mod_files, clean.misc_files
        ));
    }

    if report.launched {
        out.push_str("\nModel launched; output in nohup.out\n");
    }

    out
}

/// Format the single-template summary.
pub fn format_single_summary(staged: &StagedRewrite, output: &std::path::Path) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Wrote '{}' with {} replacements\n",
        output.display(),
        staged.total()
    ));
    for hit in &staged.hits {
        out.push_str(&format!("  {:<16} {} line(s)\n", hit.rule, hit.lines));
    }
    out
}

/// Format the clean-only summary.
pub fn format_clean_summary(clean: &CleanSummary) -> String {
    format!(
        "Cleared {} files ({} logs, {} cached, {} .mod, {} other)",
        clean.total(),
        clean.log_files,
        clean.cache_files,
        clean.mod_files,
        clean.misc_files
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            params: StarParams {
                mass: 1.5,
                metallicity: 0.02,
            },
            mass_literal: "1.50".to_string(),
            z_literal: "0.02d0".to_string(),
            mesa_version: "15140".to_string(),
            files: vec![FileSummary {
                path: PathBuf::from("/model/inlist_start"),
                replacements: 3,
                hits: vec![RuleHit {
                    rule: "initial_mass".to_string(),
                    lines: 1,
                }],
            }],
            clean: Some(CleanSummary {
                log_files: 12,
                cache_files: 4,
                mod_files: 2,
                misc_files: 1,
            }),
            launched: true,
        }
    }

    #[test]
    fn update_summary_includes_parameters_and_files() {
        let text = format_update_summary(&report());
        assert!(text.contains("Initial M: 1.50 Msun"));
        assert!(text.contains("Initial Z: 0.02d0"));
        assert!(text.contains("MESA version: 15140"));
        assert!(text.contains("inlist_start"));
        assert!(text.contains("3 replacements"));
        assert!(text.contains("12 log files"));
        assert!(text.contains("nohup.out"));
    }

    #[test]
    fn single_summary_counts_replacements_not_fields() {
        use crate::inlist::rewrite::apply_rules;
        use crate::inlist::rules::param_rules;

        let params = StarParams {
            mass: 1.5,
            metallicity: 0.02,
        };
        let rules = param_rules(&params).unwrap();
        // Two mass lines plus one metallicity line: three replacements.
        let template = "initial_mass = 1.0\ninitial_mass = 1.0\ninitial_z = 0.014d0\n";
        let (_, hits) = apply_rules(template, &rules);
        let staged = staged_with_hits(hits);

        let text = format_single_summary(&staged, std::path::Path::new("/model/inlist_run"));
        assert!(text.contains("3 replacements"));
        assert!(!text.contains("fields"));
        assert!(text.contains("/model/inlist_run"));
    }

    fn staged_with_hits(hits: Vec<RuleHit>) -> StagedRewrite {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inlist");
        std::fs::write(&path, "").unwrap();
        let mut staged = crate::inlist::rewrite::stage_file(&path, &[]).unwrap();
        staged.hits = hits;
        staged
    }

    #[test]
    fn update_summary_omits_optional_sections() {
        let mut r = report();
        r.clean = None;
        r.launched = false;
        let text = format_update_summary(&r);
        assert!(!text.contains("Cleared:"));
        assert!(!text.contains("launched"));
    }
}
