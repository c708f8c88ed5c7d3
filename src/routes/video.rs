use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::Result,
    gate::Admitted,
    models::{VideoId, VideoMetadata},
    services::CacheClass,
    text::{hashtags::extract_hashtags, tags::rule_based_tags},
    AppState,
};

const DERIVED_TAG_COUNT: usize = 15;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/video/info", post(info))
        .route("/video/tags", post(tags))
        .route("/video/hashtags", post(hashtags))
}

#[derive(Debug, Deserialize)]
struct VideoRequest {
    #[serde(alias = "id", alias = "video")]
    url: String,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    #[serde(flatten)]
    video: VideoMetadata,
    source: &'static str,
}

async fn info(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<InfoResponse>> {
    let Json(req) = payload?;
    let id = VideoId::parse(&req.url)?;
    let resolution = state.resolver.resolve(&id, CacheClass::Info).await?;

    Ok(Json(InfoResponse {
        video: resolution.metadata,
        source: resolution.source,
    }))
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    id: VideoId,
    title: String,
    tags: Vec<String>,
    /// The uploader set no keywords; `tags` were pulled from title and description.
    derived: bool,
    source: &'static str,
}

async fn tags(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<TagsResponse>> {
    let Json(req) = payload?;
    let id = VideoId::parse(&req.url)?;
    let resolution = state.resolver.resolve(&id, CacheClass::Derived).await?;
    let video = resolution.metadata;

    let (tags, derived) = if video.keywords.is_empty() {
        (rule_based_tags(&video.title, &video.description, DERIVED_TAG_COUNT), true)
    } else {
        (video.keywords, false)
    };

    Ok(Json(TagsResponse {
        id: video.id,
        title: video.title,
        tags,
        derived,
        source: resolution.source,
    }))
}

#[derive(Debug, Serialize)]
struct HashtagsResponse {
    id: VideoId,
    title: String,
    hashtags: Vec<String>,
    source: &'static str,
}

async fn hashtags(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<HashtagsResponse>> {
    let Json(req) = payload?;
    let id = VideoId::parse(&req.url)?;
    let resolution = state.resolver.resolve(&id, CacheClass::Derived).await?;
    let video = resolution.metadata;

    let hashtags = extract_hashtags(&format!("{}\n{}", video.title, video.description));

    Ok(Json(HashtagsResponse {
        id: video.id,
        title: video.title,
        hashtags,
        source: resolution.source,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, post_json, sample_video, DownSource, StaticSource};
    use crate::services::sources::DataApiSource;
    use axum::http::{header, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_info_resolves_and_caches() {
        let app = app(10, vec![Arc::new(StaticSource(sample_video()))]);
        let body = json!({ "url": "https://youtu.be/dQw4w9WgXcQ" });

        let (status, _, json) = post_json(app.clone(), "/api/video/info", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "dQw4w9WgXcQ");
        assert_eq!(json["author"], "Fireship");
        assert_eq!(json["duration_seconds"], 149);
        assert_eq!(json["source"], "static");

        let (_, _, again) = post_json(app, "/api/video/info", body).await;
        assert_eq!(again["source"], "cache");
        assert_eq!(again["title"], json["title"]);
    }

    #[tokio::test]
    async fn test_bad_url_is_rejected() {
        let app = app(10, vec![Arc::new(StaticSource(sample_video()))]);
        let (status, _, json) =
            post_json(app, "/api/video/info", json!({ "url": "https://example.com/nope" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "validation");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = app(10, vec![Arc::new(StaticSource(sample_video()))]);
        let (status, _, _) = post_json(app, "/api/video/tags", json!({ "link": 3 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_exhausted_sources_are_retryable() {
        let app = app(10, vec![Arc::new(DownSource), Arc::new(DownSource)]);
        let (status, _, json) =
            post_json(app, "/api/video/info", json!({ "url": "dQw4w9WgXcQ" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["retryable"], true);
        assert_eq!(json["attempts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_data_api_does_not_leak_key() {
        let data_api = DataApiSource::new(reqwest::Client::new(), "http://127.0.0.1:1/youtube/v3", "SECRETKEY123");
        let app = app(10, vec![Arc::new(data_api)]);
        let (status, _, json) =
            post_json(app, "/api/video/info", json!({ "url": "dQw4w9WgXcQ" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["attempts"][0].as_str().unwrap().starts_with("data_api: "));
        assert!(!json.to_string().contains("SECRETKEY123"));
    }

    #[tokio::test]
    async fn test_tags_and_hashtags() {
        let app = app(10, vec![Arc::new(StaticSource(sample_video()))]);
        let body = json!({ "url": "https://www.youtube.com/shorts/dQw4w9WgXcQ" });

        let (_, _, tags) = post_json(app.clone(), "/api/video/tags", body.clone()).await;
        assert_eq!(tags["tags"], json!(["rust", "programming"]));
        assert_eq!(tags["derived"], false);

        let (_, _, hashtags) = post_json(app, "/api/video/hashtags", body).await;
        assert_eq!(
            hashtags["hashtags"],
            json!(["#rust", "#programming", "#100SecondsOfCode"])
        );
    }

    #[tokio::test]
    async fn test_tags_fall_back_to_title_keywords() {
        let mut video = sample_video();
        video.keywords.clear();
        let app = app(10, vec![Arc::new(StaticSource(video))]);
        let (_, _, json) = post_json(app, "/api/video/tags", json!({ "url": "dQw4w9WgXcQ" })).await;
        assert_eq!(json["derived"], true);
        assert!(json["tags"].as_array().unwrap().contains(&json!("rust")));
    }

    #[tokio::test]
    async fn test_budget_exhaustion_returns_429() {
        let app = app(2, vec![Arc::new(StaticSource(sample_video()))]);
        let body = json!({ "url": "dQw4w9WgXcQ" });

        for _ in 0..2 {
            let (status, _, _) = post_json(app.clone(), "/api/video/info", body.clone()).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, json) = post_json(app, "/api/video/info", body).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["kind"], "admission_denied");
        let retry_after: u64 = headers[header::RETRY_AFTER].to_str().unwrap().parse().unwrap();
        assert!(retry_after > 0 && retry_after <= 300);
    }
}
