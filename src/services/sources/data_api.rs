// structured data api (videos.list)
use async_trait::async_trait;
use serde::Deserialize;

use super::{MetadataSource, RawPayload, SourceError};
use crate::models::VideoId;

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<DataApiVideo>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataApiVideo {
    pub id: String,
    pub snippet: Snippet,
    pub content_details: ContentDetails,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub published_at: Option<String>,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub tags: Vec<String>,
    /// `none`, `live` or `upcoming`
    pub live_broadcast_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDetails {
    /// ISO-8601, e.g. `PT4M13S`
    pub duration: Option<String>,
    pub region_restriction: Option<RegionRestriction>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RegionRestriction {
    pub allowed: Option<Vec<String>>,
    pub blocked: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    /// the api sends counts as decimal strings
    pub view_count: Option<String>,
}

pub struct DataApiSource {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DataApiSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MetadataSource for DataApiSource {
    fn name(&self) -> &'static str {
        "data_api"
    }

    async fn fetch(&self, id: &VideoId) -> Result<RawPayload, SourceError> {
        let response = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let list: VideoListResponse = response
            .json()
            .await
            .map_err(SourceError::parse)?;

        list.items
            .into_iter()
            .next()
            .map(RawPayload::DataApi)
            .ok_or(SourceError::NotFound)
    }
}
