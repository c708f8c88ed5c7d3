use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::{
    error::{ApiError, Result},
    gate::Admitted,
    models::{
        GenerationKind, GenerationMode, GenerationRequest, GenerationResult, DEFAULT_MAX_RESULTS,
        MAX_RESULTS_CAP,
    },
    AppState,
};

const MAX_SUBJECT_CHARS: usize = 500;
const MAX_DETAILS_CHARS: usize = 5000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate/titles", post(titles))
        .route("/generate/hashtags", post(hashtags))
        .route("/generate/tags", post(tags))
        .route("/generate/description", post(description))
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(alias = "topic", alias = "title")]
    subject: String,
    #[serde(default)]
    niche: String,
    #[serde(default, alias = "description", alias = "key_points")]
    details: String,
    #[serde(default)]
    mode: GenerationMode,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl GenerateBody {
    fn into_request(self, kind: GenerationKind) -> Result<GenerationRequest> {
        if self.subject.chars().count() > MAX_SUBJECT_CHARS {
            return Err(ApiError::Validation(format!(
                "subject must be at most {} characters",
                MAX_SUBJECT_CHARS
            )));
        }
        if self.details.chars().count() > MAX_DETAILS_CHARS {
            return Err(ApiError::Validation(format!(
                "details must be at most {} characters",
                MAX_DETAILS_CHARS
            )));
        }
        if self.max_results == 0 {
            return Err(ApiError::Validation("max_results must be at least 1".into()));
        }

        Ok(GenerationRequest {
            kind,
            subject: self.subject.trim().to_string(),
            niche: self.niche.trim().to_lowercase(),
            details: self.details.trim().to_string(),
            mode: self.mode,
            max_results: self.max_results.min(MAX_RESULTS_CAP),
        })
    }
}

/// Stable digest of a normalized request.
fn cache_key(request: &GenerationRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.kind.as_str().as_bytes());
    for part in [&request.subject, &request.niche, &request.details] {
        hasher.update([0u8]);
        hasher.update(part.as_bytes());
    }
    hasher.update([0u8]);
    hasher.update(request.mode.to_string().as_bytes());
    hasher.update((request.max_results as u64).to_be_bytes());
    format!("generation:{}", hex::encode(hasher.finalize()))
}

async fn run(
    state: &AppState,
    kind: GenerationKind,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    let Json(body) = payload?;
    let request = body.into_request(kind)?;
    let key = cache_key(&request);

    if let Some(result) = state.cache.get::<GenerationResult>(&key) {
        tracing::debug!(kind = %kind, "generation cache hit");
        return Ok(Json(result));
    }

    let result = state.generator.generate(&request).await;
    if !result.items.is_empty() {
        state
            .cache
            .put(key, result.clone(), state.config.cache_generation_ttl());
    }
    Ok(Json(result))
}

async fn titles(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    run(&state, GenerationKind::Titles, payload).await
}

async fn hashtags(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    run(&state, GenerationKind::Hashtags, payload).await
}

async fn tags(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    run(&state, GenerationKind::Tags, payload).await
}

async fn description(
    _admitted: Admitted,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    run(&state, GenerationKind::Description, payload).await
}
