use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Rate limited - please try again later")]
    AdmissionDenied { retry_after_secs: u64 },

    #[error("All metadata sources failed")]
    UpstreamExhausted { attempts: Vec<String> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "kind": "validation" }),
            ),
            ApiError::AdmissionDenied { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": self.to_string(),
                    "kind": "admission_denied",
                    "retry_after": retry_after_secs,
                }),
            ),
            ApiError::UpstreamExhausted { attempts } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": self.to_string(),
                    "kind": "upstream_exhausted",
                    "retryable": true,
                    "attempts": attempts,
                }),
            ),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::AdmissionDenied { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
