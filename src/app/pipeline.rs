//! Shared update pipeline used by the CLI front-end.
//!
//! The full workflow is:
//! check environment -> stage rewrites in memory -> verify field markers ->
//! commit -> clean artifacts -> launch
//!
//! Staging everything before the first write means a malformed model
//! directory fails without leaving files half-updated.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::UpdateConfig;
use crate::error::AppError;
use crate::inlist::rewrite::{StagedRewrite, stage_file};
use crate::inlist::rules::{self, LABEL_INITIAL_MASS, LABEL_INITIAL_Z};
use crate::report::{FileSummary, RunReport};

/// Execute the full update pipeline and return the run report.
pub fn run_update(config: &UpdateConfig) -> Result<RunReport, AppError> {
    config.params.validate()?;
    crate::mesa::check_model_dir(&config.model_dir)?;
    let mesa_version = crate::mesa::check_install(&config.mesa_dir)?;

    let staged = stage_model_rewrites(config)?;
    verify_markers(&staged)?;

    for file in &staged {
        file.commit()?;
    }

    let clean = if config.clean {
        Some(crate::io::clean::clean_model_artifacts(
            &config.model_dir,
            &config.mesa_dir,
        )?)
    } else {
        None
    };

    if config.run_after {
        crate::mesa::launch(&config.model_dir)?;
    }

    Ok(RunReport {
        params: config.params,
        mass_literal: config.params.mass_literal(),
        z_literal: config.params.z_literal(),
        mesa_version,
        files: staged.iter().map(FileSummary::from).collect(),
        clean,
        launched: config.run_after,
    })
}

/// Stage rewrites for every model file without writing anything.
///
/// Every `inlist*` file, the `rn` script, and `make/makefile` get the rebuild
/// rules; `inlist_start` additionally gets the termination-criterion swap.
/// No line matches rules from both sets, so combining them per file keeps
/// first-match-wins semantics intact.
pub fn stage_model_rewrites(config: &UpdateConfig) -> Result<Vec<StagedRewrite>, AppError> {
    let rebuild = rules::rebuild_rules(&config.mesa_dir, &config.params)?;
    let mut with_termination = rebuild.clone();
    with_termination.extend(rules::termination_rules()?);

    let mut staged = Vec::new();
    for path in model_files(&config.model_dir)? {
        let is_start = path.file_name().is_some_and(|n| n == "inlist_start");
        let rules = if is_start { &with_termination } else { &rebuild };
        staged.push(stage_file(&path, rules)?);
    }
    Ok(staged)
}

/// The files a rebuild touches, in a stable order.
fn model_files(model_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(model_dir)
        .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", model_dir.display())))?;

    let mut inlists = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", model_dir.display())))?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().starts_with("inlist") {
            inlists.push(path);
        }
    }
    inlists.sort();

    if inlists.is_empty() {
        return Err(AppError::template(format!(
            "No inlist files found in '{}'",
            model_dir.display()
        )));
    }

    let mut files = inlists;
    files.push(model_dir.join("rn"));
    files.push(model_dir.join("make").join("makefile"));
    Ok(files)
}

/// Require the mass and metallicity markers somewhere in the inlist set.
///
/// The auxiliary toggles (pgstar, run stages, ...) legitimately appear in
/// only some files, but a model whose inlists define neither mass nor Z is
/// not one this tool understands.
fn verify_markers(staged: &[StagedRewrite]) -> Result<(), AppError> {
    for label in [LABEL_INITIAL_MASS, LABEL_INITIAL_Z] {
        let total: usize = staged
            .iter()
            .filter(|s| {
                s.path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with("inlist"))
            })
            .map(|s| s.hits_for(label))
            .sum();
        if total == 0 {
            return Err(AppError::template(format!(
                "No inlist file contains an '{label}' field; wrong or incompatible model directory?"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarParams;
    use std::fs;
    use std::path::Path;

    const INLIST_START: &str = "\
&star_job
      mesa_dir = '/old/mesa'
/ ! end of star_job

&controls
      initial_mass = 1.0
      initial_z = 0.014d0
      max_model_number = 500
      required_termination_code_string = 'log_L_lower_limit'
      log_L_lower_limit = -1.0
/ ! end of controls
";

    const INLIST_MS: &str = "\
&star_job
      !pgstar_flag = .true.
/ ! end of star_job

&controls
      initial_mass = 1.0
      initial_z = 0.014d0
/ ! end of controls
";

    const RN: &str = "\
do_one inlist_start start.mod
#do_one inlist_main_sequence ms.mod
#cp start_he_core_flash_mode final.mod
";

    const MAKEFILE: &str = "MESA_DIR = /old/mesa\ninclude $(MESA_DIR)/star/work/makefile\n";

    fn write_model(dir: &Path) {
        fs::write(dir.join("inlist_start"), INLIST_START).unwrap();
        fs::write(dir.join("inlist_main_sequence"), INLIST_MS).unwrap();
        fs::write(dir.join("rn"), RN).unwrap();
        fs::create_dir(dir.join("make")).unwrap();
        fs::write(dir.join("make/makefile"), MAKEFILE).unwrap();
    }

    fn fake_mesa() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/version_number"), "15140\n").unwrap();
        dir
    }

    fn config(model: &Path, mesa: &Path) -> UpdateConfig {
        UpdateConfig {
            model_dir: model.to_path_buf(),
            mesa_dir: mesa.to_path_buf(),
            params: StarParams {
                mass: 1.5,
                metallicity: 0.02,
            },
            clean: false,
            run_after: false,
            export_report: None,
        }
    }

    #[test]
    fn run_update_rewrites_all_model_files() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();
        write_model(model.path());

        let report = run_update(&config(model.path(), mesa.path())).unwrap();
        assert_eq!(report.mesa_version, "15140");
        assert_eq!(report.files.len(), 4);
        assert!(report.clean.is_none());
        assert!(!report.launched);

        let mesa_path = mesa.path().display().to_string();

        let start = fs::read_to_string(model.path().join("inlist_start")).unwrap();
        assert!(start.contains(&format!("mesa_dir = '{mesa_path}'")));
        assert!(start.contains("initial_mass = 1.50"));
        assert!(start.contains("initial_z = 0.02d0"));
        assert!(start.contains("! max_model_number = 500"));
        assert!(start.contains("required_termination_code_string = 'power_h_burn_upper_limit'"));
        assert!(start.contains("power_h_burn_upper_limit = 0.001"));
        assert!(!start.contains("log_L_lower_limit"));

        let ms = fs::read_to_string(model.path().join("inlist_main_sequence")).unwrap();
        assert!(ms.contains("pgstar_flag = .true."));
        assert!(!ms.contains("!pgstar_flag"));

        let rn = fs::read_to_string(model.path().join("rn")).unwrap();
        assert!(rn.contains("do_one inlist_main_sequence ms.mod"));
        assert!(rn.contains("cp start_he_core_flash_mode final.mod"));
        assert!(!rn.contains('#'));

        let makefile = fs::read_to_string(model.path().join("make/makefile")).unwrap();
        assert!(makefile.contains(&format!("MESA_DIR = {mesa_path}")));
        // The make-variable reference further down is untouched.
        assert!(makefile.contains("include $(MESA_DIR)/star/work/makefile"));
    }

    #[test]
    fn run_update_is_idempotent() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();
        write_model(model.path());

        let cfg = config(model.path(), mesa.path());
        run_update(&cfg).unwrap();
        let first = fs::read_to_string(model.path().join("inlist_start")).unwrap();
        run_update(&cfg).unwrap();
        let second = fs::read_to_string(model.path().join("inlist_start")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn run_update_fails_before_writing_when_markers_missing() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();

        // An "inlist" with no parameter fields at all.
        let original = "&controls\n      some_other_setting = 1\n/\n";
        fs::write(model.path().join("inlist_start"), original).unwrap();
        fs::write(model.path().join("rn"), RN).unwrap();
        fs::create_dir(model.path().join("make")).unwrap();
        fs::write(model.path().join("make/makefile"), MAKEFILE).unwrap();

        let err = run_update(&config(model.path(), mesa.path())).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        // Nothing was committed, not even the makefile rewrite.
        assert_eq!(
            fs::read_to_string(model.path().join("inlist_start")).unwrap(),
            original
        );
        assert_eq!(
            fs::read_to_string(model.path().join("make/makefile")).unwrap(),
            MAKEFILE
        );
    }

    #[test]
    fn run_update_rejects_unsupported_mesa_version() {
        let model = tempfile::tempdir().unwrap();
        write_model(model.path());

        let mesa = tempfile::tempdir().unwrap();
        fs::create_dir(mesa.path().join("data")).unwrap();
        fs::write(mesa.path().join("data/version_number"), "22.11.1").unwrap();

        let err = run_update(&config(model.path(), mesa.path())).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn run_update_rejects_bad_parameters_before_touching_files() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();
        write_model(model.path());

        let mut cfg = config(model.path(), mesa.path());
        cfg.params.metallicity = 0.5;
        let err = run_update(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let start = fs::read_to_string(model.path().join("inlist_start")).unwrap();
        assert_eq!(start, INLIST_START);
    }

    #[test]
    fn run_update_with_clean_clears_artifacts() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();
        write_model(model.path());

        fs::write(model.path().join("nohup.out"), "old").unwrap();
        fs::write(model.path().join("start.mod"), "old").unwrap();
        fs::create_dir(model.path().join("LOGS")).unwrap();
        fs::write(model.path().join("LOGS/history.data"), "old").unwrap();

        let mut cfg = config(model.path(), mesa.path());
        cfg.clean = true;
        let report = run_update(&cfg).unwrap();

        let clean = report.clean.unwrap();
        assert_eq!(clean.misc_files, 1);
        assert_eq!(clean.mod_files, 1);
        assert_eq!(clean.log_files, 1);
        assert!(!model.path().join("nohup.out").exists());
        assert!(!model.path().join("start.mod").exists());
    }

    #[test]
    fn model_files_requires_inlists() {
        let model = tempfile::tempdir().unwrap();
        fs::write(model.path().join("rn"), RN).unwrap();

        let err = model_files(model.path()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_rn_or_makefile_is_an_io_error() {
        let model = tempfile::tempdir().unwrap();
        let mesa = fake_mesa();
        fs::write(model.path().join("inlist_start"), INLIST_START).unwrap();

        let err = run_update(&config(model.path(), mesa.path())).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("rn"));
    }
}
