// search-index mirror (invidious-compatible /api/v1/videos)
use async_trait::async_trait;
use serde::Deserialize;

use super::{MetadataSource, RawPayload, SourceError};
use crate::models::VideoId;

const FIELDS: &str =
    "title,description,author,authorId,lengthSeconds,viewCount,keywords,published,allowedRegions,liveNow";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexVideo {
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_id: String,
    pub length_seconds: u64,
    pub view_count: u64,
    pub keywords: Vec<String>,
    /// unix seconds
    pub published: Option<i64>,
    /// empty when the mirror could not tell
    pub allowed_regions: Vec<String>,
    pub live_now: bool,
}

pub struct IndexSource {
    http: reqwest::Client,
    base_url: String,
}

impl IndexSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetadataSource for IndexSource {
    fn name(&self) -> &'static str {
        "index"
    }

    async fn fetch(&self, id: &VideoId) -> Result<RawPayload, SourceError> {
        let response = self
            .http
            .get(format!("{}/api/v1/videos/{}", self.base_url, id))
            .query(&[("fields", FIELDS)])
            .send()
            .await?;

        match response.status() {
            s if s == reqwest::StatusCode::NOT_FOUND => return Err(SourceError::NotFound),
            s if !s.is_success() => return Err(SourceError::Status(s)),
            _ => {}
        }

        let video: IndexVideo = response
            .json()
            .await
            .map_err(SourceError::parse)?;

        Ok(RawPayload::Index(video))
    }
}
