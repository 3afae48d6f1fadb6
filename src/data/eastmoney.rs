//! Blocking HTTP client for fund detail pages.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

/// The provider serves desktop markup to browser user agents; the detail
/// selectors below depend on that variant.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a page body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Cache,
    Network,
}

pub struct DetailClient {
    client: Client,
    base_url: String,
}

impl DetailClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn detail_url(&self, code: &str) -> String {
        format!("{}/{code}.html", self.base_url)
    }

    /// Fetch one detail page over the network, decoded as UTF-8.
    pub fn fetch_detail(&self, code: &str) -> Result<String, AppError> {
        let url = self.detail_url(code);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::network(format!("Request for {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(format!("HTTP {status} for {url}")));
        }

        response
            .text()
            .map_err(|e| AppError::network(format!("Failed to read body of {url}: {e}")))
    }
}
