//! `fund-report` library crate.
//!
//! The binary (`fundrep`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without spawning processes
//! - stages are reusable individually (the `fetch`/`merge`/`report`
//!   subcommands are the same functions the full run calls)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod io;
pub mod merge;
pub mod report;
