//! In-memory master table.
//!
//! The master file is hand-curated and owns columns this pipeline knows
//! nothing about, so rows are kept as raw cells. The key column and the
//! three volatile columns are resolved to indices once, at construction,
//! which keeps all label lookups at the I/O boundary.

use std::collections::HashMap;

use crate::domain::types::{
    MASTER_KEY_COLUMN, MASTER_ONE_YEAR_COLUMN, MASTER_SIZE_COLUMN, MASTER_THREE_YEAR_COLUMN,
    VolatilePatch,
};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct MasterTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Display name → row index. Built once; duplicate keys are rejected.
    index: HashMap<String, usize>,
    one_year_idx: Option<usize>,
    three_year_idx: Option<usize>,
    size_idx: Option<usize>,
}

impl MasterTable {
    /// Build a table from raw headers and rows.
    ///
    /// The key column is required and its values must be unique; the update
    /// by display name is ambiguous otherwise. Volatile columns may be
    /// absent, in which case patches simply skip them.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, AppError> {
        let column = |name: &str| headers.iter().position(|h| h == name);

        let key_idx = column(MASTER_KEY_COLUMN).ok_or_else(|| {
            AppError::input(format!("Master file is missing the '{MASTER_KEY_COLUMN}' column."))
        })?;

        let mut index = HashMap::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let key = row.get(key_idx).map(String::as_str).unwrap_or_default();
            if index.insert(key.to_string(), row_idx).is_some() {
                return Err(AppError::input(format!(
                    "Master file has duplicate '{MASTER_KEY_COLUMN}' value '{key}'; updates by name would be ambiguous."
                )));
            }
        }

        Ok(Self {
            one_year_idx: column(MASTER_ONE_YEAR_COLUMN),
            three_year_idx: column(MASTER_THREE_YEAR_COLUMN),
            size_idx: column(MASTER_SIZE_COLUMN),
            headers,
            rows,
            index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row key and column label.
    pub fn cell(&self, key: &str, column: &str) -> Option<&str> {
        let row = &self.rows[*self.index.get(key)?];
        let col = self.headers.iter().position(|h| h == column)?;
        row.get(col).map(String::as_str)
    }

    pub fn row_by_key(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.rows[i].as_slice())
    }

    /// Overwrite this row's volatile cells from a patch.
    ///
    /// Returns `true` when the key matched and at least one cell was
    /// written. Keys absent from the table are skipped — that is how rows
    /// outside the scraped cohort survive a merge untouched.
    pub fn apply_patch(&mut self, patch: &VolatilePatch) -> bool {
        let Some(&row_idx) = self.index.get(&patch.display_name) else {
            return false;
        };

        let mut touched = false;
        let updates = [
            (self.one_year_idx, patch.one_year.as_ref()),
            (self.three_year_idx, patch.three_year.as_ref()),
            (self.size_idx, patch.size.as_ref()),
        ];
        for (col, value) in updates {
            if let (Some(col), Some(value)) = (col, value) {
                self.rows[row_idx][col] = value.clone();
                touched = true;
            }
        }
        touched
    }

    /// Tear the table down into raw headers and rows (display rendering).
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }
}
