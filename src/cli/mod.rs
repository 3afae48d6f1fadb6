//! Command-line parsing and group selection.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline stages.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::FundGroupConfig;
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fundrep", version, about = "Fund data pipeline: scrape, merge, report")]
pub struct Cli {
    /// Process only the named fund group (default: every configured group).
    #[arg(short = 'g', long, global = true, value_name = "ID")]
    pub group: Option<String>,

    /// JSON file replacing the built-in fund-group configuration.
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands. `run` is the default when none is given.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, merge and report every selected group.
    Run,
    /// Scrape detail pages into the intermediate file only.
    Fetch,
    /// Merge the intermediate file into the master file only.
    Merge,
    /// Render the HTML report from the master file only.
    Report,
}

/// Resolve the `--group` selection against the configuration.
///
/// Runs before any stage does work, so a typo rejects the whole invocation
/// instead of failing halfway through.
pub fn select_groups<'a>(
    config: &'a AppConfig,
    group: Option<&str>,
) -> Result<Vec<&'a FundGroupConfig>, AppError> {
    match group {
        None => Ok(config.groups.iter().collect()),
        Some(id) => match config.group(id) {
            Some(group) => Ok(vec![group]),
            None => Err(AppError::usage(format!(
                "Unknown fund group '{id}'. Valid groups: {}",
                config.group_ids().join(", ")
            ))),
        },
    }
}
