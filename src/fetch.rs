//! Fetch stage: one scraped record per configured fund, in entry order.
//!
//! Per-fund failures (network, structure, validation) are absorbed into the
//! fund's own row and never abort the batch; the stage itself only fails on
//! local I/O problems (cache or output file).

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::data::cache::PageCache;
use crate::data::eastmoney::{DetailClient, PageSource};
use crate::data::parse::parse_detail_page;
use crate::domain::{FundEntry, FundGroupConfig, ScrapedRecord};
use crate::error::AppError;
use crate::io::write_scraped_file;

/// Pause after each request that actually went over the network. Cache hits
/// do not pause.
const FETCH_DELAY: Duration = Duration::from_millis(500);

/// Scrape every fund of a group and write the intermediate file.
pub fn run(group: &FundGroupConfig, client: &DetailClient, cache: &PageCache) -> Result<(), AppError> {
    let records = scrape_group(group, client, cache)?;
    write_scraped_file(&group.scraped_file, &records)?;
    info!(
        group = %group.id,
        rows = records.len(),
        file = %group.scraped_file.display(),
        "scrape finished"
    );
    Ok(())
}

/// Scrape a group into memory: exactly one record per entry, in entry order.
pub fn scrape_group(
    group: &FundGroupConfig,
    client: &DetailClient,
    cache: &PageCache,
) -> Result<Vec<ScrapedRecord>, AppError> {
    let mut records = Vec::with_capacity(group.entries.len());
    for entry in &group.entries {
        let (record, source) = scrape_entry(entry, client, cache)?;
        if let Some(error) = &record.error {
            warn!(code = %entry.code, name = %entry.source_name, %error, "fund scrape failed");
        } else {
            debug!(code = %entry.code, ?source, "fund scraped");
        }
        records.push(record);

        if source == Some(PageSource::Network) {
            thread::sleep(FETCH_DELAY);
        }
    }
    Ok(records)
}

/// Scrape one fund. Returns the record plus where the page body came from
/// (`None` when no body was obtained at all).
fn scrape_entry(
    entry: &FundEntry,
    client: &DetailClient,
    cache: &PageCache,
) -> Result<(ScrapedRecord, Option<PageSource>), AppError> {
    if let Some(body) = cache.lookup(&entry.code) {
        return Ok((parse_into_record(entry, &body), Some(PageSource::Cache)));
    }

    match client.fetch_detail(&entry.code) {
        Ok(body) => {
            cache.store(&entry.code, &body)?;
            Ok((parse_into_record(entry, &body), Some(PageSource::Network)))
        }
        Err(err) => Ok((ScrapedRecord::network_failure(entry, &err.to_string()), None)),
    }
}

fn parse_into_record(entry: &FundEntry, body: &str) -> ScrapedRecord {
    match parse_detail_page(body, &entry.source_name, &entry.code) {
        Ok(fields) => ScrapedRecord {
            title: fields.title,
            one_year: fields.one_year,
            three_year: fields.three_year,
            size_and_date: fields.size_and_date,
            tracking_info: fields.tracking_info,
            ..ScrapedRecord::empty(entry)
        },
        Err(err) => {
            ScrapedRecord::scrape_failure(entry, err.title().unwrap_or_default(), &err.to_string())
        }
    }
}
