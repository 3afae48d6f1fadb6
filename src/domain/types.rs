//! Fund configuration entries and scraped records.
//!
//! The Chinese column labels are the wire format of the hand-maintained data
//! files; they live here as constants so the I/O layer is the only place that
//! maps between labels and struct fields.

use std::path::PathBuf;

use serde::Deserialize;

/// Column headers of the scraped intermediate file, in wire order.
pub const SCRAPED_HEADER: [&str; 7] = [
    "基金代码",
    "基金名称",
    "抓取到的标题",
    "近一年",
    "近三年",
    "规模及日期",
    "跟踪信息",
];

/// Master-file key column (fund display name, unique).
pub const MASTER_KEY_COLUMN: &str = "名称";
/// Master-file volatile columns, refreshed by the merge.
pub const MASTER_ONE_YEAR_COLUMN: &str = "一年涨幅(%)";
pub const MASTER_THREE_YEAR_COLUMN: &str = "三年涨幅(%)";
pub const MASTER_SIZE_COLUMN: &str = "规模(亿元)";

/// Marker prefixes written into the one-year column of a failed row.
pub const NETWORK_ERROR_MARKER: &str = "网络错误: ";
pub const SCRAPE_ERROR_MARKER: &str = "抓取失败: ";

/// One fund tracked by a group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FundEntry {
    /// Provider fund identifier. Leading zeros are significant, so this is
    /// never parsed as a number.
    pub code: String,
    /// Name used as the row key in the master record file.
    pub display_name: String,
    /// Name as it appears on the provider's detail page (and in the scraped
    /// file's name column).
    pub source_name: String,
}

/// One fund group: a named cohort sharing one scraped file, one master file
/// and one report.
#[derive(Debug, Clone, Deserialize)]
pub struct FundGroupConfig {
    pub id: String,
    pub report_title: String,
    pub entries: Vec<FundEntry>,
    pub scraped_file: PathBuf,
    pub master_file: PathBuf,
    pub report_file: PathBuf,
}

/// One row of the scraped intermediate file.
///
/// A failed fund still produces a record; the failure text is carried in
/// `error` and serialized into the one-year column with a marker prefix,
/// which is the file's established format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedRecord {
    pub code: String,
    pub name: String,
    pub title: String,
    pub one_year: String,
    pub three_year: String,
    pub size_and_date: String,
    pub tracking_info: String,
    pub error: Option<String>,
}

impl ScrapedRecord {
    /// Record for a fund whose page could not be fetched at all.
    pub fn network_failure(entry: &FundEntry, message: &str) -> Self {
        Self {
            error: Some(format!("{NETWORK_ERROR_MARKER}{message}")),
            ..Self::empty(entry)
        }
    }

    /// Record for a fund whose page was fetched but failed parsing or
    /// validation. The title, when extracted, is kept for diagnosis.
    pub fn scrape_failure(entry: &FundEntry, title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            error: Some(format!("{SCRAPE_ERROR_MARKER}{message}")),
            ..Self::empty(entry)
        }
    }

    /// Base record for a fund with no extracted data yet.
    pub fn empty(entry: &FundEntry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.source_name.clone(),
            title: String::new(),
            one_year: String::new(),
            three_year: String::new(),
            size_and_date: String::new(),
            tracking_info: String::new(),
            error: None,
        }
    }

    /// True when the row carries actual data rather than an error marker.
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }

    /// Cells in wire order. The error, when present, occupies the one-year
    /// column.
    pub fn to_row(&self) -> [String; 7] {
        let one_year = match &self.error {
            Some(err) => err.clone(),
            None => self.one_year.clone(),
        };
        [
            self.code.clone(),
            self.name.clone(),
            self.title.clone(),
            one_year,
            self.three_year.clone(),
            self.size_and_date.clone(),
            self.tracking_info.clone(),
        ]
    }

    /// Rebuild a record from wire cells, recognizing error markers in the
    /// one-year column.
    pub fn from_row(cells: [String; 7]) -> Self {
        let [code, name, title, one_year, three_year, size_and_date, tracking_info] = cells;
        let is_marker =
            one_year.starts_with(NETWORK_ERROR_MARKER) || one_year.starts_with(SCRAPE_ERROR_MARKER);
        let (one_year, error) = if is_marker {
            (String::new(), Some(one_year))
        } else {
            (one_year, None)
        };
        Self {
            code,
            name,
            title,
            one_year,
            three_year,
            size_and_date,
            tracking_info,
            error,
        }
    }
}

/// Update payload for one master row.
///
/// `None` fields leave the corresponding master cell untouched, so a partial
/// scrape (e.g. a page where only the size was found) never blanks data that
/// is already in the master file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolatilePatch {
    pub display_name: String,
    pub one_year: Option<String>,
    pub three_year: Option<String>,
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> FundEntry {
        FundEntry {
            code: "017436".to_string(),
            display_name: "华宝纳斯达克精选股票(QDII)A".to_string(),
            source_name: "华宝纳斯达克精选股票发起式(QDII)A".to_string(),
        }
    }

    #[test]
    fn clean_record_round_trips_through_wire_cells() {
        let record = ScrapedRecord {
            code: "017436".to_string(),
            name: "华宝纳斯达克精选股票发起式(QDII)A".to_string(),
            title: "华宝纳斯达克精选股票发起式(QDII)A(017436)".to_string(),
            one_year: "12.34%".to_string(),
            three_year: "--".to_string(),
            size_and_date: "12.97亿元（2024-03-31）".to_string(),
            tracking_info: "跟踪误差：0.52%".to_string(),
            error: None,
        };
        let back = ScrapedRecord::from_row(record.to_row());
        assert_eq!(back, record);
        assert!(back.is_clean());
    }

    #[test]
    fn network_failure_serializes_marker_into_one_year_column() {
        let record = ScrapedRecord::network_failure(&entry(), "connection refused");
        assert!(!record.is_clean());

        let row = record.to_row();
        assert_eq!(row[3], "网络错误: connection refused");
        assert!(row[2].is_empty());

        let back = ScrapedRecord::from_row(row);
        assert_eq!(back, record);
        assert!(back.one_year.is_empty());
    }

    #[test]
    fn scrape_failure_keeps_extracted_title() {
        let record = ScrapedRecord::scrape_failure(&entry(), "某个无关页面标题", "标题校验失败");
        let row = record.to_row();
        assert_eq!(row[2], "某个无关页面标题");
        assert_eq!(row[3], "抓取失败: 标题校验失败");
        assert!(!ScrapedRecord::from_row(row).is_clean());
    }
}
