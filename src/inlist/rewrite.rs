//! Line-oriented file rewriting.
//!
//! Rewrites are **staged** in memory first and committed afterwards, so the
//! whole update can be validated (are the expected field markers present?)
//! before any file on disk is touched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::StarParams;
use crate::error::AppError;
use crate::inlist::rules::{self, LABEL_INITIAL_MASS, LABEL_INITIAL_Z, RewriteRule};

/// How many lines one rule changed in one file.
#[derive(Debug, Clone, Serialize)]
pub struct RuleHit {
    pub rule: String,
    pub lines: usize,
}

/// A rewrite that has been computed but not yet written to disk.
#[derive(Debug, Clone)]
pub struct StagedRewrite {
    pub path: PathBuf,
    pub hits: Vec<RuleHit>,
    new_text: String,
}

impl StagedRewrite {
    /// Total lines changed across all rules.
    pub fn total(&self) -> usize {
        self.hits.iter().map(|h| h.lines).sum()
    }

    /// Lines changed by the rule with the given label.
    pub fn hits_for(&self, label: &str) -> usize {
        self.hits
            .iter()
            .filter(|h| h.rule == label)
            .map(|h| h.lines)
            .sum()
    }

    /// Write the staged text back to the source path.
    pub fn commit(&self) -> Result<(), AppError> {
        self.commit_to(&self.path)
    }

    /// Write the staged text to `output` (creating or overwriting it).
    pub fn commit_to(&self, output: &Path) -> Result<(), AppError> {
        fs::write(output, &self.new_text).map_err(|e| {
            AppError::io(format!("Failed to write '{}': {e}", output.display()))
        })
    }
}

/// Apply rules line by line. The first matching rule wins per line; within
/// that line every occurrence of its pattern is replaced. Line endings and
/// all unmatched content are preserved byte for byte.
pub fn apply_rules(text: &str, rules: &[RewriteRule]) -> (String, Vec<RuleHit>) {
    let mut counts = vec![0usize; rules.len()];
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let mut rewritten = None;
        for (i, rule) in rules.iter().enumerate() {
            if rule.matches(line) {
                rewritten = Some(rule.apply(line));
                counts[i] += 1;
                break;
            }
        }
        match rewritten {
            Some(line) => out.push_str(&line),
            None => out.push_str(line),
        }
    }

    let hits = rules
        .iter()
        .zip(&counts)
        .filter(|&(_, &n)| n > 0)
        .map(|(rule, &n)| RuleHit {
            rule: rule.label.to_string(),
            lines: n,
        })
        .collect();

    (out, hits)
}

/// Read `path` and stage the given rules against its content.
pub fn stage_file(path: &Path, rules: &[RewriteRule]) -> Result<StagedRewrite, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read '{}': {e}", path.display())))?;
    let (new_text, hits) = apply_rules(&text, rules);
    Ok(StagedRewrite {
        path: path.to_path_buf(),
        hits,
        new_text,
    })
}

/// Substitute initial mass and metallicity in a single template file.
///
/// Fails before writing anything if the template is missing either field
/// marker; everything other than the two assignments is preserved verbatim.
pub fn update_template(
    template: &Path,
    output: &Path,
    params: &StarParams,
) -> Result<StagedRewrite, AppError> {
    params.validate()?;

    let rules = rules::param_rules(params)?;
    let staged = stage_file(template, &rules)?;

    for label in [LABEL_INITIAL_MASS, LABEL_INITIAL_Z] {
        if staged.hits_for(label) == 0 {
            return Err(AppError::template(format!(
                "Template '{}' has no '{label}' field to update",
                template.display()
            )));
        }
    }

    staged.commit_to(output)?;
    Ok(staged)
}
