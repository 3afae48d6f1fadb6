//! Scraped intermediate file: tab-separated, UTF-8 with a BOM.
//!
//! The BOM matches the file's established hand-off format (spreadsheet tools
//! mis-detect the Chinese headers without it). The file is fully overwritten
//! on every scrape run; it never accumulates rows across runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::domain::{SCRAPED_HEADER, ScrapedRecord};
use crate::error::AppError;

const BOM: &str = "\u{feff}";

pub fn write_scraped_file(path: &Path, records: &[ScrapedRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create scraped file '{}': {e}", path.display()))
    })?;

    let mut out = BufWriter::new(file);
    out.write_all(BOM.as_bytes())
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;

    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(out);
    writer
        .write_record(SCRAPED_HEADER)
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;
    for record in records {
        writer
            .write_record(&record.to_row())
            .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))
}

pub fn read_scraped_file(path: &Path) -> Result<Vec<ScrapedRecord>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Missing scraped file '{}': {e}", path.display()))
    })?;

    let mut reader = ReaderBuilder::new().delimiter(b'\t').from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?;
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if names != SCRAPED_HEADER {
        return Err(AppError::input(format!(
            "Unexpected columns in '{}': {names:?}",
            path.display()
        )));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1; data rows are 1-based after it.
        let line = idx + 2;
        let row = result
            .map_err(|e| AppError::input(format!("Bad row at {}:{line}: {e}", path.display())))?;
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        let cells: [String; 7] = cells.try_into().map_err(|_| {
            AppError::input(format!("Bad column count at {}:{line}", path.display()))
        })?;
        records.push(ScrapedRecord::from_row(cells));
    }
    Ok(records)
}

fn normalize_header_name(name: &str) -> String {
    // The writer puts a BOM before the first header; strip it (and stray
    // whitespace) before comparing names.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::FundEntry;

    fn entry(code: &str) -> FundEntry {
        FundEntry {
            code: code.to_string(),
            display_name: format!("基金{code}"),
            source_name: format!("基金{code}发起式"),
        }
    }

    fn clean_record(code: &str) -> ScrapedRecord {
        ScrapedRecord {
            code: code.to_string(),
            name: format!("基金{code}发起式"),
            title: format!("基金{code}发起式({code})"),
            one_year: "12.34%".to_string(),
            three_year: "--".to_string(),
            size_and_date: "12.97亿元（2024-03-31）".to_string(),
            tracking_info: String::new(),
            error: None,
        }
    }

    #[test]
    fn file_round_trips_and_carries_a_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped.tsv");

        let records = vec![
            clean_record("017436"),
            ScrapedRecord::network_failure(&entry("270042"), "connection refused"),
        ];
        write_scraped_file(&path, &records).unwrap();

        let raw = fs::read(&path).unwrap();
        assert!(raw.starts_with("\u{feff}".as_bytes()));

        let back = read_scraped_file(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn rows_keep_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped.tsv");

        let records = vec![clean_record("017436"), clean_record("270042"), clean_record("018043")];
        write_scraped_file(&path, &records).unwrap();

        let codes: Vec<String> =
            read_scraped_file(&path).unwrap().into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["017436", "270042", "018043"]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_scraped_file(&dir.path().join("absent.tsv")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn wrong_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped.tsv");
        fs::write(&path, "a\tb\tc\td\te\tf\tg\n1\t2\t3\t4\t5\t6\t7\n").unwrap();
        let err = read_scraped_file(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
