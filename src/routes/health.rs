use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

// not gated: load balancers poll this
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cache_entries": state.cache.len(),
        "sources": state.resolver.source_names(),
        "ai_configured": state.generator.ai_configured(),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, send};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };

    #[tokio::test]
    async fn test_health_is_not_rate_limited() {
        let app = app(0, Vec::new());
        let (status, _, json) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ai_configured"], false);
    }
}
