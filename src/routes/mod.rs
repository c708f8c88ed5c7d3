pub mod analyze;
pub mod generate;
pub mod health;
pub mod video;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Everything under `/api`. Each handler spends one admission point.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(video::routes())
        .merge(generate::routes())
        .merge(analyze::routes())
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::{
        build_app,
        cache::ResultCache,
        config::Config,
        gate::RateLimiter,
        models::VideoId,
        services::{
            sources::{index::IndexVideo, MetadataSource, RawPayload, SourceError},
            GenerationOrchestrator, MetadataResolver,
        },
        AppState,
    };

    /// Serves the same index payload for every id.
    pub struct StaticSource(pub IndexVideo);

    #[async_trait]
    impl MetadataSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, _id: &VideoId) -> Result<RawPayload, SourceError> {
            Ok(RawPayload::Index(self.0.clone()))
        }
    }

    pub struct DownSource;

    #[async_trait]
    impl MetadataSource for DownSource {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn fetch(&self, _id: &VideoId) -> Result<RawPayload, SourceError> {
            Err(SourceError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    pub fn app(points: u32, sources: Vec<Arc<dyn MetadataSource>>) -> Router {
        let config = Config::for_tests();
        let cache = ResultCache::new(100);
        let resolver = sources.into_iter().fold(
            MetadataResolver::new(cache.clone(), Duration::from_secs(5)),
            |resolver, source| resolver.with_source(source),
        );
        let state = AppState {
            config,
            cache,
            limiter: RateLimiter::new(points, Duration::from_secs(300)),
            resolver,
            generator: GenerationOrchestrator::new(),
        };
        build_app(Arc::new(state))
    }

    pub fn sample_video() -> IndexVideo {
        IndexVideo {
            title: "Rust in 100 Seconds #rust".into(),
            description: "Learn Rust fast. #programming #Rust #100SecondsOfCode".into(),
            author: "Fireship".into(),
            author_id: "UCsBjURrPoezykLs9EqgamOA".into(),
            length_seconds: 149,
            view_count: 2_000_000,
            keywords: vec!["rust".into(), "programming".into()],
            ..Default::default()
        }
    }

    pub async fn post_json(
        app: Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    pub async fn send(
        app: Router,
        request: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }
}
