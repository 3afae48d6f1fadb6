//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - loads the fund-group configuration
//! - dispatches the requested stage(s) to the pipeline

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, select_groups};
use crate::config::AppConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fundrep` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // We want `fundrep` and `fundrep -g nasdaq` to behave like
    // `fundrep run ...`. Clap requires a subcommand name, so we do a small,
    // explicit rewrite of the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::builtin(),
    };
    config.apply_env_overrides();

    let groups = select_groups(&config, cli.group.as_deref())?;

    match cli.command {
        Command::Run => pipeline::run_groups(&config, &groups),
        Command::Fetch => pipeline::fetch_groups(&config, &groups),
        Command::Merge => {
            pipeline::for_each_group(&groups, "merge", crate::merge::run);
            Ok(())
        }
        Command::Report => {
            pipeline::for_each_group(&groups, "report", crate::report::run);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Rewrite argv so a bare invocation defaults to the `run` subcommand.
///
/// Rules:
/// - `fundrep`                      -> `fundrep run`
/// - `fundrep -g nasdaq ...`        -> `fundrep run -g nasdaq ...`
/// - `fundrep --help/--version/-h`  -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fetch" | "merge" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is (clap will produce the usage error).
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["fundrep"])), args(&["fundrep", "run"]));
    }

    #[test]
    fn leading_flag_defaults_to_run() {
        assert_eq!(
            rewrite_args(args(&["fundrep", "-g", "nasdaq"])),
            args(&["fundrep", "run", "-g", "nasdaq"])
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        assert_eq!(
            rewrite_args(args(&["fundrep", "report", "-g", "sp500"])),
            args(&["fundrep", "report", "-g", "sp500"])
        );
    }

    #[test]
    fn help_and_version_pass_through() {
        assert_eq!(rewrite_args(args(&["fundrep", "--help"])), args(&["fundrep", "--help"]));
        assert_eq!(rewrite_args(args(&["fundrep", "-V"])), args(&["fundrep", "-V"]));
    }
}
