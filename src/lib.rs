pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod routes;
pub mod services;
pub mod text;

pub use config::Config;
pub use error::{ApiError, Result};

use axum::{http::Method, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use cache::ResultCache;
use gate::RateLimiter;
use services::ai::OpenAiCompatClient;
use services::sources::{data_api::DataApiSource, index::IndexSource, watch_page::WatchPageSource};
use services::{GenerationOrchestrator, MetadataResolver};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: ResultCache,
    pub limiter: RateLimiter,
    pub resolver: MetadataResolver,
    pub generator: GenerationOrchestrator,
}

impl AppState {
    /// Wires every component from configuration. Sources and the AI tier
    /// that lack credentials are left out of their chains.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let cache = ResultCache::new(config.cache_max_entries);
        let limiter = RateLimiter::new(config.rate_limit_points, config.rate_limit_window());

        let mut resolver = MetadataResolver::new(cache.clone(), config.source_timeout()).with_ttls(
            Duration::from_secs(config.cache_info_ttl),
            Duration::from_secs(config.cache_derived_ttl),
        );
        if let Some(key) = config.youtube_api_key.as_deref().filter(|k| !k.is_empty()) {
            resolver = resolver.with_source(Arc::new(DataApiSource::new(
                http.clone(),
                &config.youtube_api_url,
                key,
            )));
        }
        let resolver = resolver
            .with_source(Arc::new(IndexSource::new(http.clone(), &config.index_url)))
            .with_source(Arc::new(WatchPageSource::new(http.clone(), &config.watch_url)));

        let mut generator = GenerationOrchestrator::new();
        if let Some(key) = config.ai_api_key.as_deref().filter(|k| !k.is_empty()) {
            let client = OpenAiCompatClient::new(http.clone(), &config.ai_base_url, key, &config.ai_model);
            generator = generator.with_ai(Arc::new(client), config.ai_timeout());
        }

        Ok(Self {
            config,
            cache,
            limiter,
            resolver,
            generator,
        })
    }
}

fn build_cors(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        // Development: allow all origins
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = build_cors(&state.config.cors_origins);

    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::health::routes())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(256 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
