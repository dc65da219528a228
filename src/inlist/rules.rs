//! Rewrite rules for MESA model files.
//!
//! A rule is a regex pattern plus a replacement. Rules are applied line by
//! line; the first rule whose pattern matches a line rewrites it and no later
//! rule is tried on that line. Replacements are literal by default so MESA
//! paths containing `$` cannot trigger capture expansion.

use std::path::Path;

use regex::Regex;

use crate::domain::StarParams;
use crate::error::AppError;

/// Rule labels used for per-file hit reporting and marker validation.
pub const LABEL_INITIAL_MASS: &str = "initial_mass";
pub const LABEL_INITIAL_Z: &str = "initial_z";

/// A single line-oriented rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub label: &'static str,
    pattern: Regex,
    replacement: String,
    expand: bool,
}

impl RewriteRule {
    /// Rule with a literal replacement (no capture expansion).
    pub fn new(
        label: &'static str,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, AppError> {
        Self::build(label, pattern, replacement, false)
    }

    /// Rule whose replacement may reference captures (`${1}` etc.).
    pub fn expanding(
        label: &'static str,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, AppError> {
        Self::build(label, pattern, replacement, true)
    }

    fn build(
        label: &'static str,
        pattern: &str,
        replacement: impl Into<String>,
        expand: bool,
    ) -> Result<Self, AppError> {
        let pattern = Regex::new(pattern).map_err(|e| {
            AppError::template(format!("Invalid rewrite pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            label,
            pattern,
            replacement: replacement.into(),
            expand,
        })
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Replace every match within `line`.
    pub fn apply(&self, line: &str) -> String {
        if self.expand {
            self.pattern.replace_all(line, self.replacement.as_str()).into_owned()
        } else {
            self.pattern
                .replace_all(line, regex::NoExpand(&self.replacement))
                .into_owned()
        }
    }
}

/// The mass/metallicity substitutions alone.
///
/// This is the rule set behind the single-template operation; the full
/// rebuild set below includes these same two rules.
pub fn param_rules(params: &StarParams) -> Result<Vec<RewriteRule>, AppError> {
    Ok(vec![
        RewriteRule::new(
            LABEL_INITIAL_MASS,
            "initial_mass = .*",
            format!("initial_mass = {}", params.mass_literal()),
        )?,
        RewriteRule::new(
            LABEL_INITIAL_Z,
            "initial_z = .*",
            format!("initial_z = {}", params.z_literal()),
        )?,
    ])
}

/// Rules applied to every `inlist*` file, the `rn` script, and
/// `make/makefile` during a rebuild.
pub fn rebuild_rules(mesa_dir: &Path, params: &StarParams) -> Result<Vec<RewriteRule>, AppError> {
    let mesa = mesa_dir.display();
    let mut rules = vec![
        // MESA_DIR in the makefile (no quotes), mesa_dir in inlist headers (quoted).
        RewriteRule::new("MESA_DIR", "MESA_DIR = .*", format!("MESA_DIR = {mesa}"))?,
        RewriteRule::new("mesa_dir", "mesa_dir = .*", format!("mesa_dir = '{mesa}'"))?,
    ];
    rules.extend(param_rules(params)?);
    rules.extend([
        // Show the plotting window for all stages.
        RewriteRule::new("pgstar_flag", "!pgstar_flag", "pgstar_flag")?,
        // Enable all run stages in the rn script.
        RewriteRule::new("do_one", "#do_one inlist_", "do_one inlist_")?,
        RewriteRule::new(
            "he_core_flash",
            "#cp start_he_core_flash_mode",
            "cp start_he_core_flash_mode",
        )?,
        // Comment out the model cap; it stops MESA runs from completing.
        // Anchored so an already-commented line is left alone.
        RewriteRule::expanding(
            "max_model_number",
            r"^(\s*)max_model_number",
            "${1}! max_model_number",
        )?,
    ]);
    Ok(rules)
}

/// Swap the star birth criterion in `inlist_start` from a luminosity limit
/// to hydrogen burning.
pub fn termination_rules() -> Result<Vec<RewriteRule>, AppError> {
    Ok(vec![
        RewriteRule::new(
            "termination_code",
            "required_termination_code_string = 'log_L_lower_limit'",
            "required_termination_code_string = 'power_h_burn_upper_limit'",
        )?,
        RewriteRule::new(
            "h_burn_limit",
            "log_L_lower_limit .*",
            "power_h_burn_upper_limit = 0.001",
        )?,
    ])
}
