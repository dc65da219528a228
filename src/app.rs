//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the MESA install location
//! - runs the update/clean/launch pipeline
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{CleanArgs, Command, RunArgs, SingleArgs, UpdateArgs};
use crate::domain::{StarParams, UpdateConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mesaprep` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mesaprep` and `mesaprep -m 1.5` to behave like
    // `mesaprep update ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Update(args) => handle_update(args),
        Command::Single(args) => handle_single(args),
        Command::Clean(args) => handle_clean(args),
        Command::Run(args) => handle_run(args),
    }
}

fn handle_update(args: UpdateArgs) -> Result<(), AppError> {
    let config = update_config_from_args(&args);
    let report = pipeline::run_update(&config)?;

    println!("{}", crate::report::format_update_summary(&report));

    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &report)?;
    }
    Ok(())
}

fn handle_single(args: SingleArgs) -> Result<(), AppError> {
    let params = StarParams {
        mass: args.mass,
        metallicity: args.metallicity,
    };
    let staged = crate::inlist::update_template(&args.template, &args.output, &params)?;
    println!(
        "{}",
        crate::report::format_single_summary(&staged, &args.output)
    );
    Ok(())
}

fn handle_clean(args: CleanArgs) -> Result<(), AppError> {
    crate::mesa::check_model_dir(&args.model_dir)?;
    let mesa_dir = resolve_mesa_dir(args.mesa_dir);
    let summary = crate::io::clean::clean_model_artifacts(&args.model_dir, &mesa_dir)?;
    println!("{}", crate::report::format_clean_summary(&summary));
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    crate::mesa::check_model_dir(&args.model_dir)?;
    crate::mesa::launch(&args.model_dir)?;
    println!(
        "Model launched from '{}'; output in nohup.out",
        args.model_dir.display()
    );
    Ok(())
}

pub fn update_config_from_args(args: &UpdateArgs) -> UpdateConfig {
    UpdateConfig {
        model_dir: args.model_dir.clone(),
        mesa_dir: resolve_mesa_dir(args.mesa_dir.clone()),
        params: StarParams {
            mass: args.mass,
            metallicity: args.metallicity,
        },
        clean: !args.no_clean,
        run_after: args.run,
        export_report: args.export_report.clone(),
    }
}

/// Resolve the MESA install path: explicit flag first, then the `MESA_DIR`
/// environment variable (a `.env` file is honored), then the `/opt/mesa`
/// default used on the course VMs.
pub fn resolve_mesa_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    dotenvy::dotenv().ok();
    match std::env::var("MESA_DIR") {
        Ok(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from("/opt/mesa"),
    }
}

/// Rewrite argv so `mesaprep` defaults to `mesaprep update`.
///
/// Rules:
/// - `mesaprep`                     -> `mesaprep update`
/// - `mesaprep -m 1.5 ...`          -> `mesaprep update -m 1.5 ...`
/// - `mesaprep --help/--version/-h` -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("update".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "update" | "single" | "clean" | "run");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "update flags".
    if arg1.starts_with('-') {
        argv.insert(1, "update".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_update() {
        assert_eq!(
            rewrite_args(argv(&["mesaprep"])),
            argv(&["mesaprep", "update"])
        );
    }

    #[test]
    fn leading_flags_default_to_update() {
        assert_eq!(
            rewrite_args(argv(&["mesaprep", "-m", "1.5"])),
            argv(&["mesaprep", "update", "-m", "1.5"])
        );
    }

    #[test]
    fn explicit_subcommands_are_untouched() {
        for sub in ["update", "single", "clean", "run", "--help", "-V", "help"] {
            let args = argv(&["mesaprep", sub]);
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn explicit_mesa_dir_wins_over_environment() {
        let explicit = PathBuf::from("/custom/mesa");
        assert_eq!(resolve_mesa_dir(Some(explicit.clone())), explicit);
    }
}
