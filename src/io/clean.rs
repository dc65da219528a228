//! Clearing stale run artifacts before a rebuild.
//!
//! A rebuild invalidates the previous run's logs, caches, and saved models;
//! leaving them in place makes MESA restart from stale state.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::AppError;

/// Counts of removed artifacts, for reporting.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CleanSummary {
    /// Files removed from `LOGS*` directories.
    pub log_files: usize,
    /// Files removed from MESA `cache/` directories and `.mesa_temp_cache/`.
    pub cache_files: usize,
    /// Saved `*.mod` model files removed.
    pub mod_files: usize,
    /// `nohup.out`, `star`, and other one-off leftovers removed.
    pub misc_files: usize,
}

impl CleanSummary {
    pub fn total(&self) -> usize {
        self.log_files + self.cache_files + self.mod_files + self.misc_files
    }
}

/// Remove logs, caches, saved models, and run leftovers.
pub fn clean_model_artifacts(model_dir: &Path, mesa_dir: &Path) -> Result<CleanSummary, AppError> {
    let mut summary = CleanSummary::default();

    for name in ["nohup.out", "star"] {
        if remove_if_present(&model_dir.join(name))? {
            summary.misc_files += 1;
        }
    }

    // LOGS, LOGS1, LOGS2, ... in the model directory.
    for dir in subdirs_with_prefix(model_dir, "LOGS")? {
        summary.log_files += remove_files_in(&dir)?;
    }

    // Every cache directory under the MESA tree, plus the model's own
    // temp cache.
    for entry in WalkDir::new(mesa_dir).into_iter() {
        let entry = entry.map_err(|e| {
            AppError::io(format!("Failed to walk '{}': {e}", mesa_dir.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let in_cache = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .is_some_and(|name| name == "cache");
        if in_cache && remove_if_present(entry.path())? {
            summary.cache_files += 1;
        }
    }
    let temp_cache = model_dir.join(".mesa_temp_cache");
    if temp_cache.is_dir() {
        summary.cache_files += remove_files_in(&temp_cache)?;
    }

    // Saved models from earlier stages.
    for entry in read_dir(model_dir)? {
        let path = entry.path();
        if path.is_file()
            && path.extension().is_some_and(|ext| ext == "mod")
            && remove_if_present(&path)?
        {
            summary.mod_files += 1;
        }
    }

    Ok(summary)
}

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, AppError> {
    let iter = fs::read_dir(dir)
        .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", dir.display())))?;
    iter.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", dir.display())))
}

fn subdirs_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<std::path::PathBuf>, AppError> {
    let mut out = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry.path();
        if path.is_dir()
            && entry.file_name().to_string_lossy().starts_with(prefix)
        {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Remove every regular file directly inside `dir`, returning the count.
fn remove_files_in(dir: &Path) -> Result<usize, AppError> {
    let mut removed = 0;
    for entry in read_dir(dir)? {
        let path = entry.path();
        if path.is_file() && remove_if_present(&path)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Delete a file if it exists. Missing files are fine; anything else
/// (permissions, etc.) is an error.
fn remove_if_present(path: &Path) -> Result<bool, AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::io(format!(
            "Failed to remove '{}': {e}",
            path.display()
        ))),
    }
}
