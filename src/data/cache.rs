//! Time-based on-disk page cache.
//!
//! One file per fund code; freshness is judged by file modification time
//! against a fixed window. A rerun within the window reads every page from
//! disk and never touches the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::AppError;

/// Freshness window for cached pages.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    ttl: Duration,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(dir, CACHE_TTL)
    }

    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: dir.into(), ttl }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.html"))
    }

    /// The cached body for this code, if present and fresh.
    pub fn lookup(&self, code: &str) -> Option<String> {
        let path = self.path_for(code);
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        if age >= self.ttl {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    /// Persist a fetched body, creating the cache directory on first use.
    pub fn store(&self, code: &str, body: &str) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::usage(format!("Failed to create cache dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.path_for(code);
        fs::write(&path, body).map_err(|e| {
            AppError::usage(format!("Failed to write cache file '{}': {e}", path.display()))
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
