use axum::{
    extract::rejection::JsonRejection,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::Result,
    gate::Admitted,
    text::{density_report, tokenizer::DensityReport},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze/density", post(density))
}

#[derive(Debug, Deserialize)]
struct DensityRequest {
    text: String,
    #[serde(default)]
    extra_stopwords: Vec<String>,
}

async fn density(
    _admitted: Admitted,
    payload: std::result::Result<Json<DensityRequest>, JsonRejection>,
) -> Result<Json<DensityReport>> {
    let Json(req) = payload?;
    Ok(Json(density_report(&req.text, req.extra_stopwords.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, post_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_density_counts_stay_separate() {
        let app = app(10, Vec::new());
        let (status, _, json) = post_json(
            app,
            "/api/analyze/density",
            json!({
                "text": "The Best Web Development Tutorial for Web Developers",
                "extra_stopwords": ["tutorial"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["raw_word_count"], 8);
        assert_eq!(json["total_filtered_words"], 5);
        assert_eq!(json["keywords"][0]["word"], "web");
        assert_eq!(json["keywords"][0]["count"], 2);
        let percentage = json["keywords"][0]["percentage"].as_f64().unwrap();
        assert!((percentage - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_text_is_rejected() {
        let app = app(10, Vec::new());
        let (status, _, _) = post_json(app, "/api/analyze/density", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
