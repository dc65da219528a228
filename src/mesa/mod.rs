//! Interaction with the external MESA installation.
//!
//! MESA is configured and launched by this tool, never implemented by it.
//! This module covers the environment checks (install present, supported
//! version) and the `./clean` / `./mk` / `./rn` launch sequence.

use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::AppError;

/// The course model files only work with this MESA release.
pub const SUPPORTED_VERSION: &str = "15140";

/// Check that the model directory exists.
pub fn check_model_dir(model_dir: &Path) -> Result<(), AppError> {
    if !model_dir.is_dir() {
        return Err(AppError::io(format!(
            "Could not find model path: {}",
            model_dir.display()
        )));
    }
    Ok(())
}

/// Check that the MESA install exists and carries the supported version.
///
/// Returns the version string read from `data/version_number`.
pub fn check_install(mesa_dir: &Path) -> Result<String, AppError> {
    if !mesa_dir.is_dir() {
        return Err(AppError::env(format!(
            "Could not find MESA directory: {}",
            mesa_dir.display()
        )));
    }

    let version_file = mesa_dir.join("data").join("version_number");
    let version = fs::read_to_string(&version_file).map_err(|e| {
        AppError::env(format!(
            "Failed to read MESA version file '{}': {e}",
            version_file.display()
        ))
    })?;
    let version = version.trim().to_string();

    if version != SUPPORTED_VERSION {
        return Err(AppError::env(format!(
            "MESA version {version} is not supported. Must be {SUPPORTED_VERSION}"
        )));
    }
    Ok(version)
}

/// Rebuild and launch the model.
///
/// Runs `./clean` and `./mk` to completion, then starts `./rn` detached with
/// combined output in `nohup.out`. The simulation itself is not supervised.
pub fn launch(model_dir: &Path) -> Result<(), AppError> {
    run_step(model_dir, "./clean")?;
    run_step(model_dir, "./mk")?;

    let log_path = model_dir.join("nohup.out");
    let stdout = File::create(&log_path).map_err(|e| {
        AppError::io(format!("Failed to create '{}': {e}", log_path.display()))
    })?;
    let stderr = stdout.try_clone().map_err(|e| {
        AppError::io(format!("Failed to reopen '{}': {e}", log_path.display()))
    })?;

    Command::new("./rn")
        .current_dir(model_dir)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|e| {
            AppError::env(format!(
                "Failed to start ./rn in '{}': {e}",
                model_dir.display()
            ))
        })?;
    Ok(())
}

fn run_step(model_dir: &Path, script: &str) -> Result<(), AppError> {
    let status = Command::new(script)
        .current_dir(model_dir)
        .status()
        .map_err(|e| {
            AppError::env(format!(
                "Failed to run {script} in '{}': {e}",
                model_dir.display()
            ))
        })?;
    if !status.success() {
        return Err(AppError::env(format!("{script} exited with {status}")));
    }
    Ok(())
}
