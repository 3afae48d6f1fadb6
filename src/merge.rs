//! Merge stage: refresh the master file's volatile columns from scraped data.
//!
//! Both files are treated as display-name → row maps: the three volatile
//! cells are overwritten for keys present in both, and every other row and
//! column passes through untouched. Master rows outside the scraped cohort
//! (e.g. share classes that are tracked by hand only) survive unmodified.
//!
//! The master file is only written after the full update has succeeded in
//! memory, so a failing merge leaves it exactly as the previous run did.

use std::collections::HashMap;

use tracing::info;

use crate::domain::{FundGroupConfig, MasterTable, ScrapedRecord, VolatilePatch};
use crate::error::AppError;
use crate::io::{load_master_file, read_scraped_file, store_master_file};

/// Run the merge for one fund group.
pub fn run(group: &FundGroupConfig) -> Result<(), AppError> {
    let scraped = read_scraped_file(&group.scraped_file)?;
    let mut master = load_master_file(&group.master_file)?;

    let patches = build_patches(group, &scraped);
    let updated = apply_volatile_updates(&mut master, &patches);

    store_master_file(&group.master_file, &master)?;
    info!(
        group = %group.id,
        updated,
        rows = master.len(),
        file = %group.master_file.display(),
        "merge finished"
    );
    Ok(())
}

/// Translate clean scraped rows into master-keyed patches.
///
/// - rows whose source name has no mapping in the group are dropped
/// - rows carrying an error marker contribute nothing
/// - empty fields become `None` so they never blank a master cell
pub fn build_patches(group: &FundGroupConfig, scraped: &[ScrapedRecord]) -> Vec<VolatilePatch> {
    let mapping: HashMap<&str, &str> = group
        .entries
        .iter()
        .map(|e| (e.source_name.as_str(), e.display_name.as_str()))
        .collect();

    scraped
        .iter()
        .filter(|record| record.is_clean())
        .filter_map(|record| {
            let display_name = mapping.get(record.name.as_str())?;
            Some(VolatilePatch {
                display_name: (*display_name).to_string(),
                one_year: non_empty(&record.one_year),
                three_year: non_empty(&record.three_year),
                size: non_empty(&record.size_and_date),
            })
        })
        .collect()
}

/// Overwrite volatile cells for every patch whose key exists in the table.
///
/// Returns the number of rows touched. Patches without a matching key are
/// skipped silently: a fund missing from the master file is deliberately
/// left for the curator to add.
pub fn apply_volatile_updates(master: &mut MasterTable, patches: &[VolatilePatch]) -> usize {
    patches.iter().filter(|p| master.apply_patch(p)).count()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
