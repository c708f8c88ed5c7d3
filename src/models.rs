use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ApiError, Result};

pub const VIDEO_ID_LEN: usize = 11;

/// Canonical 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts a bare id or any of the usual watch/share URL shapes.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ApiError::Validation("video url or id is required".into()));
        }

        if is_valid_id(input) {
            return Ok(Self(input.to_string()));
        }

        let with_scheme = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        let parsed = url::Url::parse(&with_scheme)
            .map_err(|_| ApiError::Validation(format!("not a video url: {}", input)))?;

        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        let host = host.trim_start_matches("www.").trim_start_matches("m.");

        let candidate = match host {
            "youtu.be" => parsed
                .path_segments()
                .and_then(|mut s| s.next())
                .map(str::to_string),
            "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
                let mut segments = parsed.path_segments().into_iter().flatten();
                match segments.next() {
                    Some("watch") => parsed
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                        segments.next().map(str::to_string)
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        match candidate {
            Some(id) if is_valid_id(&id) => Ok(Self(id)),
            _ => Err(ApiError::Validation(format!("not a video url: {}", input))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Normalized video metadata. Every field is populated (empty or zero when the
/// source did not provide it) except the optional ones that carry meaning when
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub channel_id: String,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub keywords: Vec<String>,
    /// `YYYY-MM-DD` when known
    pub upload_date: Option<String>,
    /// Region codes the video may be played in; `None` means no allow-list.
    pub available_regions: Option<Vec<String>>,
    /// Region codes the video is blocked in; `None` means no block-list.
    /// Unrestricted only when both lists are absent.
    pub blocked_regions: Option<Vec<String>>,
    pub is_live: bool,
}

impl VideoMetadata {
    pub fn empty(id: VideoId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            author: String::new(),
            channel_id: String::new(),
            duration_seconds: 0,
            view_count: 0,
            keywords: Vec::new(),
            upload_date: None,
            available_regions: None,
            blocked_regions: None,
            is_live: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Titles,
    Hashtags,
    Tags,
    Description,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::Hashtags => "hashtags",
            Self::Tags => "tags",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    Ai,
    #[default]
    Economy,
    #[serde(alias = "rule_based", alias = "rules")]
    RuleBased,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => write!(f, "ai"),
            Self::Economy => write!(f, "economy"),
            Self::RuleBased => write!(f, "rule-based"),
        }
    }
}

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const MAX_RESULTS_CAP: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub subject: String,
    pub niche: String,
    /// Extra body text: the video description for tags, newline-separated
    /// bullet points for descriptions. Ignored by the other kinds.
    pub details: String,
    pub mode: GenerationMode,
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub items: Vec<String>,
    /// Tier that actually produced `items`.
    pub mode: GenerationMode,
    pub ai_attempted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}
