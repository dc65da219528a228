//! Shared domain types.
//!
//! These are intentionally small and serializable so the same values can be
//! used in-memory during an update and exported in the JSON run report.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// User-supplied stellar parameters for a model run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarParams {
    /// Initial mass of the star in solar masses.
    pub mass: f64,
    /// Initial metallicity: mass fraction of elements heavier than helium.
    pub metallicity: f64,
}

impl StarParams {
    /// Reject non-physical values before any file is touched.
    ///
    /// The course models only cover Z up to 0.04; MESA itself would reject
    /// worse values much later, after a rebuild has already been started.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(AppError::params(format!(
                "Initial mass {} is not valid. Must be positive!",
                self.mass
            )));
        }
        if !self.metallicity.is_finite() || !(0.0..=0.04).contains(&self.metallicity) {
            return Err(AppError::params(format!(
                "Initial Z {} is not valid. Must be between 0 and 0.04",
                self.metallicity
            )));
        }
        Ok(())
    }

    /// Mass rendered the way the inlists expect it, e.g. `1.50`.
    pub fn mass_literal(&self) -> String {
        format!("{:.2}", self.mass)
    }

    /// Metallicity as a Fortran double-precision literal, e.g. `0.02d0`.
    pub fn z_literal(&self) -> String {
        format!("{:.2}d0", self.metallicity)
    }
}

/// Resolved configuration for a full model-directory update.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Directory holding the MESA model (inlists, `rn`, `make/makefile`).
    pub model_dir: PathBuf,
    /// MESA installation directory (e.g. `/opt/mesa`).
    pub mesa_dir: PathBuf,
    pub params: StarParams,
    /// Clear logs, caches, and old model files before the next run.
    pub clean: bool,
    /// Launch `./clean && ./mk && ./rn` after a successful rewrite.
    pub run_after: bool,
    /// Optional JSON run-report destination.
    pub export_report: Option<PathBuf>,
}
