//! Pipeline configuration.
//!
//! The fund groups ship as built-in defaults mirroring the hand-maintained
//! tables this pipeline tracks (a NASDAQ-100 cohort and an S&P 500 cohort).
//! `--config` replaces them with a JSON file of the same shape. Either way,
//! the loaded value is immutable for the rest of the run; stages receive it
//! by reference and share no other state.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{FundEntry, FundGroupConfig};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://fund.eastmoney.com";
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Environment overrides, read after `.env` loading.
pub const ENV_BASE_URL: &str = "FUND_BASE_URL";
pub const ENV_CACHE_DIR: &str = "FUND_CACHE_DIR";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Provider endpoint; detail pages live at `{base_url}/{code}.html`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory holding one cached page body per fund code.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    pub groups: Vec<FundGroupConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

impl AppConfig {
    /// The built-in fund groups.
    pub fn builtin() -> Self {
        Self {
            base_url: default_base_url(),
            cache_dir: default_cache_dir(),
            groups: vec![nasdaq_group(), sp500_group()],
        }
    }

    /// Load a replacement configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::usage(format!("Failed to open config '{}': {e}", path.display()))
        })?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| AppError::usage(format!("Invalid config '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FUND_BASE_URL` / `FUND_CACHE_DIR` overrides when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            self.cache_dir = PathBuf::from(dir);
        }
    }

    pub fn group(&self, id: &str) -> Option<&FundGroupConfig> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_ids(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.id.as_str()).collect()
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.groups.is_empty() {
            return Err(AppError::usage("Config defines no fund groups."));
        }
        for (i, group) in self.groups.iter().enumerate() {
            if self.groups[..i].iter().any(|g| g.id == group.id) {
                return Err(AppError::usage(format!(
                    "Config defines fund group '{}' more than once.",
                    group.id
                )));
            }
        }
        Ok(())
    }
}

fn entry(code: &str, display_name: &str, source_name: &str) -> FundEntry {
    FundEntry {
        code: code.to_string(),
        display_name: display_name.to_string(),
        source_name: source_name.to_string(),
    }
}

fn nasdaq_group() -> FundGroupConfig {
    FundGroupConfig {
        id: "nasdaq".to_string(),
        report_title: "纳斯达克100基金数据每日报告".to_string(),
        entries: vec![
            entry("017436", "华宝纳斯达克精选股票(QDII)A", "华宝纳斯达克精选股票发起式(QDII)A"),
            entry("270042", "广发纳斯达克100ETF联接(QDII)A", "广发纳斯达克100ETF联接人民币(QDII)A"),
            entry("018043", "天弘纳斯达克100指数(QDII)A", "天弘纳斯达克100指数发起(QDII)A"),
            entry("016055", "博时纳斯达克100ETF联接(QDII)A", "博时纳斯达克100ETF发起式联接(QDII)A人民币"),
            entry("016532", "嘉实纳斯达克100ETF联接(QDII)A", "嘉实纳斯达克100ETF发起联接(QDII)A人民币"),
            entry("016452", "南方纳斯达克100指数(QDII)A", "南方纳斯达克100指数发起(QDII)A"),
            entry("019172", "摩根纳斯达克100指数(QDII)A", "摩根纳斯达克100指数(QDII)人民币A"),
            entry("539001", "建信纳斯达克100指数(QDII)A", "建信纳斯达克100指数(QDII)A"),
            entry("161130", "易方达纳斯达克100ETF联接(QDII-LOF)A", "易方达纳斯达克100ETF联接(QDII-LOF)A"),
        ],
        scraped_file: PathBuf::from("nasdaq_scraped_details.tsv"),
        master_file: PathBuf::from("nasdaq_fund_data.tsv"),
        report_file: PathBuf::from("nasdaq_report.html"),
    }
}

fn sp500_group() -> FundGroupConfig {
    FundGroupConfig {
        id: "sp500".to_string(),
        report_title: "标普500基金数据每日报告".to_string(),
        entries: vec![
            entry("017028", "国泰标普500ETF发起联接(QDII)A", "国泰标普500ETF发起联接(QDII)A人民币"),
            entry("007721", "天弘标普500(QDII-FOF)A", "天弘标普500发起(QDII-FOF)A"),
            entry("018064", "华夏标普500ETF联接(QDII)A", "华夏标普500ETF发起式联接(QDII)A"),
            entry("017641", "摩根标普500指数(QDII)A", "摩根纳斯达克100指数(QDII)人民币A"),
            entry("096001", "大成标普500等权重指数(QDII)A", "大成标普500等权重指数(QDII)A人民币"),
        ],
        scraped_file: PathBuf::from("sp500_scraped_details.tsv"),
        master_file: PathBuf::from("sp500_fund_data.tsv"),
        report_file: PathBuf::from("sp500_report.html"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        let config = AppConfig::builtin();
        config.validate().unwrap();
        assert_eq!(config.group_ids(), vec!["nasdaq", "sp500"]);
        assert_eq!(config.group("nasdaq").unwrap().entries.len(), 9);
        assert_eq!(config.group("sp500").unwrap().entries.len(), 5);
        assert!(config.group("csi300").is_none());
    }

    #[test]
    fn fund_codes_keep_leading_zeros() {
        let config = AppConfig::builtin();
        let codes: Vec<_> = config.group("sp500").unwrap().entries.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"007721"));
        assert!(codes.contains(&"096001"));
    }

    #[test]
    fn json_config_replaces_builtin_groups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "base_url": "http://127.0.0.1:8080",
                "groups": [{{
                    "id": "csi300",
                    "report_title": "沪深300基金数据每日报告",
                    "entries": [{{
                        "code": "000311",
                        "display_name": "景顺长城沪深300增强A",
                        "source_name": "景顺长城沪深300指数增强A"
                    }}],
                    "scraped_file": "csi300_scraped_details.tsv",
                    "master_file": "csi300_fund_data.tsv",
                    "report_file": "csi300_report.html"
                }}]
            }}"#
        )
        .unwrap();

        let config = AppConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        // Cache dir falls back to the default when omitted.
        assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(config.group_ids(), vec!["csi300"]);
    }

    #[test]
    fn duplicate_group_ids_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"groups": [
                {{"id": "a", "report_title": "t", "entries": [],
                  "scraped_file": "a.tsv", "master_file": "b.tsv", "report_file": "c.html"}},
                {{"id": "a", "report_title": "t", "entries": [],
                  "scraped_file": "d.tsv", "master_file": "e.tsv", "report_file": "f.html"}}
            ]}}"#
        )
        .unwrap();

        let err = AppConfig::from_json_file(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
