//! Video metadata resolution across an ordered chain of sources.
//!
//! Sources are tried one at a time, cheapest first. The first payload with a
//! non-empty title wins, is normalized into [`VideoMetadata`] and cached. When
//! every source fails the caller gets a single `UpstreamExhausted` error that
//! lists what went wrong at each tier.

use std::sync::Arc;
use std::time::Duration;

use super::sources::{parse_iso8601_duration, MetadataSource, RawPayload, SourceError};
use crate::cache::ResultCache;
use crate::error::{ApiError, Result};
use crate::models::{VideoId, VideoMetadata};

/// How long a resolved video stays cached depends on what it is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    /// Full info lookups
    Info,
    /// Tag / hashtag extraction
    Derived,
}

impl CacheClass {
    fn as_str(&self) -> &'static str {
        match self {
            CacheClass::Info => "info",
            CacheClass::Derived => "derived",
        }
    }
}

fn cache_key(class: CacheClass, id: &VideoId) -> String {
    format!("video:{}:{}", class.as_str(), id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub metadata: VideoMetadata,
    /// Source that produced the metadata, or `cache`
    pub source: &'static str,
}

impl Resolution {
    pub fn from_cache(&self) -> bool {
        self.source == "cache"
    }
}

#[derive(Clone)]
pub struct MetadataResolver {
    sources: Vec<Arc<dyn MetadataSource>>,
    cache: ResultCache,
    source_timeout: Duration,
    info_ttl: Duration,
    derived_ttl: Duration,
}

impl MetadataResolver {
    pub fn new(cache: ResultCache, source_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            cache,
            source_timeout,
            info_ttl: Duration::from_secs(3600),
            derived_ttl: Duration::from_secs(600),
        }
    }

    /// Appends a source to the end of the chain.
    pub fn with_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_ttls(mut self, info_ttl: Duration, derived_ttl: Duration) -> Self {
        self.info_ttl = info_ttl;
        self.derived_ttl = derived_ttl;
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn ttl(&self, class: CacheClass) -> Duration {
        match class {
            CacheClass::Info => self.info_ttl,
            CacheClass::Derived => self.derived_ttl,
        }
    }

    fn cached(&self, id: &VideoId, class: CacheClass) -> Option<VideoMetadata> {
        let hit = self.cache.get::<VideoMetadata>(&cache_key(class, id));
        match (hit, class) {
            (Some(metadata), _) => Some(metadata),
            // fresh full info is good enough for derived lookups
            (None, CacheClass::Derived) => self.cache.get(&cache_key(CacheClass::Info, id)),
            (None, CacheClass::Info) => None,
        }
    }

    pub async fn resolve(&self, id: &VideoId, class: CacheClass) -> Result<Resolution> {
        if let Some(metadata) = self.cached(id, class) {
            tracing::debug!(video = %id, "metadata cache hit");
            return Ok(Resolution {
                metadata,
                source: "cache",
            });
        }

        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let name = source.name();
            tracing::debug!(video = %id, source = name, "trying metadata source");

            let outcome = match tokio::time::timeout(self.source_timeout, source.fetch(id)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout),
            };

            match outcome {
                Ok(payload) if !payload.title().trim().is_empty() => {
                    let metadata = normalize(id, payload);
                    self.cache
                        .put(cache_key(class, id), metadata.clone(), self.ttl(class));
                    tracing::info!(video = %id, source = name, "metadata resolved");
                    return Ok(Resolution {
                        metadata,
                        source: name,
                    });
                }
                Ok(_) => {
                    tracing::warn!(video = %id, source = name, "source returned no title");
                    attempts.push(format!("{}: empty title", name));
                }
                Err(e) => {
                    tracing::warn!(video = %id, source = name, error = %e, "metadata source failed");
                    attempts.push(format!("{}: {}", name, e));
                }
            }
        }

        tracing::warn!(video = %id, tried = attempts.len(), "all metadata sources exhausted");
        Err(ApiError::UpstreamExhausted { attempts })
    }
}

/// Maps any source payload onto the canonical shape. Missing values become
/// empty strings and zeroes.
pub fn normalize(id: &VideoId, payload: RawPayload) -> VideoMetadata {
    let mut metadata = VideoMetadata::empty(id.clone());

    match payload {
        RawPayload::DataApi(video) => {
            let snippet = video.snippet;
            metadata.title = snippet.title.trim().to_string();
            metadata.description = snippet.description;
            metadata.author = snippet.channel_title;
            metadata.channel_id = snippet.channel_id;
            metadata.keywords = snippet.tags;
            metadata.upload_date = snippet.published_at.as_deref().and_then(date_part);
            metadata.is_live = snippet.live_broadcast_content.as_deref() == Some("live");
            metadata.duration_seconds = video
                .content_details
                .duration
                .as_deref()
                .and_then(parse_iso8601_duration)
                .unwrap_or_default();
            if let Some(restriction) = video.content_details.region_restriction {
                metadata.available_regions = restriction.allowed;
                metadata.blocked_regions = restriction.blocked.filter(|b| !b.is_empty());
            }
            metadata.view_count = video
                .statistics
                .view_count
                .and_then(|v| v.parse().ok())
                .unwrap_or_default();
        }
        RawPayload::Index(video) => {
            metadata.title = video.title.trim().to_string();
            metadata.description = video.description;
            metadata.author = video.author;
            metadata.channel_id = video.author_id;
            metadata.duration_seconds = video.length_seconds;
            metadata.view_count = video.view_count;
            metadata.keywords = video.keywords;
            metadata.upload_date = video
                .published
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.format("%Y-%m-%d").to_string());
            metadata.available_regions =
                (!video.allowed_regions.is_empty()).then_some(video.allowed_regions);
            metadata.is_live = video.live_now;
        }
        RawPayload::Scraped(page) => {
            metadata.title = page.title.trim().to_string();
            metadata.description = page.description.unwrap_or_default();
            metadata.author = page.author.unwrap_or_default();
            metadata.channel_id = page.channel_id.unwrap_or_default();
            metadata.duration_seconds = page
                .duration
                .as_deref()
                .and_then(parse_iso8601_duration)
                .unwrap_or_default();
            metadata.view_count = page
                .interaction_count
                .and_then(|v| v.replace(',', "").parse().ok())
                .unwrap_or_default();
            metadata.keywords = page.keywords.as_deref().map(split_list).unwrap_or_default();
            metadata.upload_date = page.upload_date.as_deref().and_then(date_part);
            metadata.available_regions = page
                .regions_allowed
                .as_deref()
                .map(split_list)
                .filter(|regions| !regions.is_empty());
            metadata.is_live = page.is_live_broadcast && !page.broadcast_ended;
        }
    }

    metadata
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `YYYY-MM-DD` prefix of an RFC 3339 timestamp or plain date.
fn date_part(value: &str) -> Option<String> {
    let date = value.trim().get(..10)?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sources::{
        data_api::{ContentDetails, RegionRestriction, Snippet, Statistics},
        DataApiVideo, IndexVideo, ScrapedPage,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Fail,
        EmptyTitle,
        Hang,
        Succeed(RawPayload),
    }

    struct FakeSource {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _id: &VideoId) -> std::result::Result<RawPayload, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Fail => Err(SourceError::NotFound),
                Behavior::EmptyTitle => Ok(RawPayload::Index(IndexVideo::default())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(SourceError::NotFound)
                }
                Behavior::Succeed(payload) => Ok(payload.clone()),
            }
        }
    }

    fn video_id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    fn scraped() -> RawPayload {
        RawPayload::Scraped(ScrapedPage {
            title: "Scraped Title".into(),
            description: Some("from the page".into()),
            duration: Some("PT1M5S".into()),
            interaction_count: Some("1,234".into()),
            keywords: Some("a, b ,,c".into()),
            upload_date: Some("2021-09-22T10:00:00-07:00".into()),
            ..ScrapedPage::default()
        })
    }

    fn resolver(sources: &[Arc<FakeSource>]) -> MetadataResolver {
        sources.iter().fold(
            MetadataResolver::new(ResultCache::new(16), Duration::from_secs(10)),
            |r, s| r.with_source(s.clone()),
        )
    }

    #[tokio::test]
    async fn test_falls_through_to_tertiary() {
        let primary = FakeSource::new("primary", Behavior::Fail);
        let secondary = FakeSource::new("secondary", Behavior::EmptyTitle);
        let tertiary = FakeSource::new("tertiary", Behavior::Succeed(scraped()));
        let resolver = resolver(&[primary.clone(), secondary.clone(), tertiary.clone()]);

        let resolution = resolver.resolve(&video_id(), CacheClass::Info).await.unwrap();

        assert_eq!(resolution.source, "tertiary");
        assert_eq!(resolution.metadata, normalize(&video_id(), scraped()));
        assert_eq!((primary.calls(), secondary.calls(), tertiary.calls()), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_primary_success_skips_the_rest() {
        let primary = FakeSource::new("primary", Behavior::Succeed(scraped()));
        let secondary = FakeSource::new("secondary", Behavior::Succeed(scraped()));
        let resolver = resolver(&[primary.clone(), secondary.clone()]);

        resolver.resolve(&video_id(), CacheClass::Info).await.unwrap();
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let primary = FakeSource::new("primary", Behavior::Succeed(scraped()));
        let resolver = resolver(&[primary.clone()]);

        let first = resolver.resolve(&video_id(), CacheClass::Info).await.unwrap();
        let second = resolver.resolve(&video_id(), CacheClass::Info).await.unwrap();

        assert_eq!(first.metadata, second.metadata);
        assert!(second.from_cache());
        assert_eq!(primary.calls(), 1);

        // derived lookups may reuse full info
        let derived = resolver.resolve(&video_id(), CacheClass::Derived).await.unwrap();
        assert!(derived.from_cache());
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_reports_every_tier() {
        let resolver = resolver(&[
            FakeSource::new("a", Behavior::Fail),
            FakeSource::new("b", Behavior::EmptyTitle),
        ]);

        match resolver.resolve(&video_id(), CacheClass::Info).await {
            Err(ApiError::UpstreamExhausted { attempts }) => {
                assert_eq!(attempts, vec!["a: video not found", "b: empty title"]);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out_and_falls_through() {
        let slow = FakeSource::new("slow", Behavior::Hang);
        let backup = FakeSource::new("backup", Behavior::Succeed(scraped()));
        let resolver = resolver(&[slow, backup]);

        let resolution = resolver.resolve(&video_id(), CacheClass::Info).await.unwrap();
        assert_eq!(resolution.source, "backup");
    }

    #[test]
    fn test_normalize_scraped_defaults() {
        let metadata = normalize(&video_id(), scraped());
        assert_eq!(metadata.duration_seconds, 65);
        assert_eq!(metadata.view_count, 1234);
        assert_eq!(metadata.keywords, vec!["a", "b", "c"]);
        assert_eq!(metadata.upload_date.as_deref(), Some("2021-09-22"));
        assert_eq!(metadata.author, "");
        assert_eq!(metadata.available_regions, None);
    }

    #[test]
    fn test_normalize_data_api() {
        let payload = RawPayload::DataApi(DataApiVideo {
            id: "dQw4w9WgXcQ".into(),
            snippet: Snippet {
                title: " Never Gonna Give You Up ".into(),
                channel_title: "Rick Astley".into(),
                tags: vec!["80s".into()],
                published_at: Some("2009-10-25T06:57:33Z".into()),
                live_broadcast_content: Some("none".into()),
                ..Snippet::default()
            },
            content_details: ContentDetails {
                duration: Some("PT3M33S".into()),
                region_restriction: Some(RegionRestriction {
                    allowed: Some(vec!["US".into()]),
                    blocked: None,
                }),
            },
            statistics: Statistics {
                view_count: Some("not a number".into()),
            },
        });

        let metadata = normalize(&video_id(), payload);
        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert_eq!(metadata.duration_seconds, 213);
        assert_eq!(metadata.view_count, 0);
        assert_eq!(metadata.upload_date.as_deref(), Some("2009-10-25"));
        assert_eq!(metadata.available_regions, Some(vec!["US".to_string()]));
        assert_eq!(metadata.blocked_regions, None);
        assert!(!metadata.is_live);
    }

    #[test]
    fn test_normalize_blocked_only_restriction() {
        let payload = RawPayload::DataApi(DataApiVideo {
            snippet: Snippet {
                title: "Blocked in Germany".into(),
                ..Snippet::default()
            },
            content_details: ContentDetails {
                duration: None,
                region_restriction: Some(RegionRestriction {
                    allowed: None,
                    blocked: Some(vec!["DE".into()]),
                }),
            },
            ..DataApiVideo::default()
        });

        let metadata = normalize(&video_id(), payload);
        assert_eq!(metadata.available_regions, None);
        assert_eq!(metadata.blocked_regions, Some(vec!["DE".to_string()]));
    }

    #[test]
    fn test_normalize_index() {
        let payload = RawPayload::Index(IndexVideo {
            title: "Live now".into(),
            published: Some(0),
            live_now: true,
            ..IndexVideo::default()
        });
        let metadata = normalize(&video_id(), payload);
        assert_eq!(metadata.upload_date.as_deref(), Some("1970-01-01"));
        assert!(metadata.is_live);
        assert_eq!(metadata.available_regions, None);
    }
}
