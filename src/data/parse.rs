//! Detail-page parsing.
//!
//! `parse_detail_page` is a pure function over the page body so it can be
//! exercised against captured fixture pages without any network access.
//!
//! The provider's markup is only loosely stable; the rule throughout is:
//! the title container and its validation are mandatory, every data field
//! is best-effort (a missing field stays empty and is not an error).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.fundDetail-tit").expect("title selector"));
static ITEM01_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dl.dataItem01").expect("dataItem01 selector"));
static ITEM02_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dl.dataItem02").expect("dataItem02 selector"));
static INFO_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.infoOfFund").expect("infoOfFund selector"));
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("td selector"));
static SPECIAL_TD_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.specialData").expect("specialData selector"));

/// Signed decimal with an optional percent sign, labeled "近1年".
static ONE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"近1年：\s*(-?[\d.]+%?)").expect("one-year regex"));
/// Same, labeled "近3年"; "--" is the provider's not-yet-available sentinel.
static THREE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"近3年：\s*(-?[\d.]+%?|--)").expect("three-year regex"));

const SIZE_LABEL: &str = "规模";
const SIZE_LABEL_PREFIX: &str = "规模：";

/// Dynamic fields extracted from one fund detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    /// Raw title text, kept verbatim for traceability.
    pub title: String,
    pub one_year: String,
    pub three_year: String,
    pub size_and_date: String,
    pub tracking_info: String,
}

/// Why a page could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The title container is missing from the markup.
    MissingTitle,
    /// The title does not name the expected fund; the raw title is kept for
    /// diagnosis.
    TitleMismatch { title: String },
}

impl PageError {
    /// The extracted title, when one was found before the failure.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::MissingTitle => None,
            Self::TitleMismatch { title } => Some(title),
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "页面结构错误 (未找到标题容器)"),
            Self::TitleMismatch { .. } => write!(f, "标题校验失败"),
        }
    }
}

impl std::error::Error for PageError {}

/// Parse one detail page.
///
/// Validation: the fund code must appear in the title, and the title must
/// start with the expected source name; both guard against the provider
/// serving a redirect or a different fund's page out of the cache.
pub fn parse_detail_page(
    body: &str,
    expected_name: &str,
    code: &str,
) -> Result<PageFields, PageError> {
    let document = Html::parse_document(body);

    let title_el = document
        .select(&TITLE_SEL)
        .next()
        .ok_or(PageError::MissingTitle)?;
    let title = text_of(title_el);

    if !title.contains(code) || !title.starts_with(expected_name) {
        return Err(PageError::TitleMismatch { title });
    }

    let mut fields = PageFields {
        title,
        ..PageFields::default()
    };

    if let Some(dl) = document.select(&ITEM01_SEL).next() {
        if let Some(caps) = ONE_YEAR_RE.captures(&text_of(dl)) {
            fields.one_year = caps[1].to_string();
        }
    }
    if let Some(dl) = document.select(&ITEM02_SEL).next() {
        if let Some(caps) = THREE_YEAR_RE.captures(&text_of(dl)) {
            fields.three_year = caps[1].to_string();
        }
    }

    if let Some(info) = document.select(&INFO_SEL).next() {
        for td in info.select(&TD_SEL) {
            let text = text_of(td);
            if text.contains(SIZE_LABEL) {
                fields.size_and_date = text.replace(SIZE_LABEL_PREFIX, "");
                break;
            }
        }
        if let Some(td) = info.select(&SPECIAL_TD_SEL).next() {
            fields.tracking_info = text_of(td);
        }
    }

    Ok(fields)
}

/// Concatenated element text with per-fragment whitespace stripped, matching
/// how the labels and figures read on the rendered page.
fn text_of(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}
