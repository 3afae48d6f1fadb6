//! Shared stage-sequencing logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> merge -> report, per fund group.
//!
//! Failures never cross fund-group boundaries: every stage is caught here,
//! logged, and the remaining groups still run. The process exits 0 even when
//! individual groups fail — per-group outcomes live in the log, and in
//! whatever output files the successful stages produced.

use tracing::{error, info};

use crate::config::AppConfig;
use crate::data::cache::PageCache;
use crate::data::eastmoney::DetailClient;
use crate::domain::FundGroupConfig;
use crate::error::AppError;
use crate::{fetch, merge, report};

/// Full pipeline over the selected groups.
pub fn run_groups(config: &AppConfig, groups: &[&FundGroupConfig]) -> Result<(), AppError> {
    let client = DetailClient::new(&config.base_url)?;
    let cache = PageCache::new(config.cache_dir.clone());

    for group in groups {
        info!(group = %group.id, "processing fund group");

        // Without fresh scraped data the rest of this group is moot; skip to
        // the next group.
        if !run_stage("fetch", group, || fetch::run(group, &client, &cache)) {
            continue;
        }

        // A failed merge does not block the report: it renders the master
        // file as the previous run left it.
        run_stage("merge", group, || merge::run(group));
        run_stage("report", group, || report::run(group));
    }
    Ok(())
}

/// Fetch-only run over the selected groups.
pub fn fetch_groups(config: &AppConfig, groups: &[&FundGroupConfig]) -> Result<(), AppError> {
    let client = DetailClient::new(&config.base_url)?;
    let cache = PageCache::new(config.cache_dir.clone());

    for group in groups {
        run_stage("fetch", group, || fetch::run(group, &client, &cache));
    }
    Ok(())
}

/// Run one stage function over the selected groups, catching per-group
/// failures.
pub fn for_each_group(
    groups: &[&FundGroupConfig],
    stage: &str,
    run: impl Fn(&FundGroupConfig) -> Result<(), AppError>,
) {
    for group in groups {
        run_stage(stage, group, || run(group));
    }
}

fn run_stage(
    stage: &str,
    group: &FundGroupConfig,
    run: impl FnOnce() -> Result<(), AppError>,
) -> bool {
    match run() {
        Ok(()) => true,
        Err(err) => {
            error!(group = %group.id, stage, %err, "stage failed; continuing");
            false
        }
    }
}
