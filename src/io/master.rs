//! Master-file load/store.
//!
//! The master file is the long-lived, hand-curated store. Loading keeps
//! every column and every row exactly as found, in order, so that a store
//! round-trips the file with nothing changed beyond the volatile cells the
//! merge overwrote. It is written without a BOM, unlike the scraped file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::domain::MasterTable;
use crate::error::AppError;

pub fn load_master_file(path: &Path) -> Result<MasterTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Missing master file '{}': {e}", path.display()))
    })?;

    let mut reader = ReaderBuilder::new().delimiter(b'\t').from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::input(format!("Bad row at {}:{line}: {e}", path.display())))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    MasterTable::new(headers, rows)
}

pub fn store_master_file(path: &Path, table: &MasterTable) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create master file '{}': {e}", path.display()))
    })?;

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));
    writer
        .write_record(table.headers())
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))
}
