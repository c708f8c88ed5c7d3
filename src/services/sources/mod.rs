//! Upstream video metadata sources.
//!
//! Every source answers the same question (what is this video?) with its own
//! payload shape. Turning those payloads into [`VideoMetadata`] is the
//! resolver's job.

pub mod data_api;
pub mod index;
pub mod watch_page;

use async_trait::async_trait;

use crate::models::VideoId;

pub use data_api::{DataApiSource, DataApiVideo};
pub use index::{IndexSource, IndexVideo};
pub use watch_page::{ScrapedPage, WatchPageSource};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Carries no URL; request URLs can hold credentials.
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),

    #[error("video not found")]
    NotFound,

    #[error("unexpected payload: {0}")]
    Parse(String),

    #[error("timed out")]
    Timeout,
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Request(e.without_url())
    }
}

impl SourceError {
    /// Decode failure of a response body, stripped of its URL.
    pub fn parse(e: reqwest::Error) -> Self {
        SourceError::Parse(e.without_url().to_string())
    }
}

/// What a source hands back on success.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    DataApi(DataApiVideo),
    Index(IndexVideo),
    Scraped(ScrapedPage),
}

impl RawPayload {
    pub fn title(&self) -> &str {
        match self {
            RawPayload::DataApi(v) => &v.snippet.title,
            RawPayload::Index(v) => &v.title,
            RawPayload::Scraped(p) => &p.title,
        }
    }
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name used in logs and failure reports
    fn name(&self) -> &'static str;

    async fn fetch(&self, id: &VideoId) -> Result<RawPayload, SourceError>;
}

/// Seconds in an ISO-8601 duration such as `PT1H2M3S` or `P1DT2H`.
pub fn parse_iso8601_duration(value: &str) -> Option<u64> {
    let rest = value.trim().strip_prefix('P')?;
    let mut seconds = 0u64;
    let mut number = String::new();
    let mut in_time = false;

    for c in rest.chars() {
        match c {
            'T' => in_time = true,
            '0'..='9' => number.push(c),
            // fractional seconds are dropped
            '.' | ',' => number.push('.'),
            unit => {
                let amount = number.split('.').next()?.parse::<u64>().ok()?;
                number.clear();
                let factor = match (unit, in_time) {
                    ('W', false) => 7 * 86_400,
                    ('D', false) => 86_400,
                    ('H', true) => 3_600,
                    ('M', true) => 60,
                    ('S', true) => 1,
                    _ => return None,
                };
                seconds = amount
                    .checked_mul(factor)
                    .and_then(|part| seconds.checked_add(part))?;
            }
        }
    }

    number.is_empty().then_some(seconds)
}
