//! Command-line parsing for the MESA model updater.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the rewrite/cleanup logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "mesaprep",
    version,
    about = "MESA stellar-model parameter updater"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite a model directory with new parameters, clear stale run
    /// artifacts, and optionally launch the model.
    Update(UpdateArgs),
    /// Substitute mass and metallicity in one template file only.
    Single(SingleArgs),
    /// Clear logs, caches, and old model files without rewriting anything.
    Clean(CleanArgs),
    /// Launch the model (./clean, ./mk, ./rn) without rewriting.
    Run(RunArgs),
}

/// Options for a full model-directory update.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// Path to the model directory (inlists, rn, make/makefile).
    #[arg(long, default_value = "../data/mesa_model")]
    pub model_dir: PathBuf,

    /// Path to the MESA installation. Defaults to $MESA_DIR, then /opt/mesa.
    #[arg(long)]
    pub mesa_dir: Option<PathBuf>,

    /// Initial mass of the star in solar masses.
    #[arg(short = 'm', long, default_value_t = 1.0)]
    pub mass: f64,

    /// Initial metallicity of the star.
    #[arg(short = 'z', long, default_value_t = 0.02)]
    pub metallicity: f64,

    /// Keep existing logs, caches, and .mod files.
    #[arg(long)]
    pub no_clean: bool,

    /// Launch the model after a successful update.
    #[arg(long)]
    pub run: bool,

    /// Export the run report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for the single-template operation.
#[derive(Debug, Parser)]
pub struct SingleArgs {
    /// Template configuration file to read.
    #[arg(long, value_name = "PATH")]
    pub template: PathBuf,

    /// Where to write the updated configuration (created or overwritten).
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Initial mass of the star in solar masses.
    #[arg(short = 'm', long, default_value_t = 1.0)]
    pub mass: f64,

    /// Initial metallicity of the star.
    #[arg(short = 'z', long, default_value_t = 0.02)]
    pub metallicity: f64,
}

/// Options for artifact cleanup.
#[derive(Debug, Parser)]
pub struct CleanArgs {
    /// Path to the model directory.
    #[arg(long, default_value = "../data/mesa_model")]
    pub model_dir: PathBuf,

    /// Path to the MESA installation. Defaults to $MESA_DIR, then /opt/mesa.
    #[arg(long)]
    pub mesa_dir: Option<PathBuf>,
}

/// Options for launch-only mode.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Path to the model directory.
    #[arg(long, default_value = "../data/mesa_model")]
    pub model_dir: PathBuf,
}
