use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha256};
use std::net::IpAddr;
use std::sync::Arc;

use super::limiter::Admission;
use crate::{error::ApiError, AppState};

const IP_HASH_SALT: &[u8] = b"creatorkit-ip-hash-salt-v1";

/// Shared bucket for callers whose address cannot be determined.
pub const ANONYMOUS_KEY: &str = "anonymous";

pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(IP_HASH_SALT);
    hasher.update(ip.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

fn extract_client_ip(parts: &Parts) -> Option<IpAddr> {
    // first hop of X-Forwarded-For (set by the reverse proxy)
    if let Some(xff) = parts.headers.get("x-forwarded-for") {
        if let Ok(s) = xff.to_str() {
            if let Some(first) = s.split(',').next() {
                if let Ok(ip) = first.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(xri) = parts.headers.get("x-real-ip") {
        if let Ok(s) = xri.to_str() {
            if let Ok(ip) = s.trim().parse() {
                return Some(ip);
            }
        }
    }

    parts
        .extensions
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip())
}

pub fn client_key(parts: &Parts) -> String {
    extract_client_ip(parts)
        .map(|ip| hash_ip(&ip.to_string()))
        .unwrap_or_else(|| ANONYMOUS_KEY.to_string())
}

/// Extractor that spends one rate-limit point for the calling client.
///
/// Handlers that take it never run for a denied caller.
#[derive(Debug, Clone)]
pub struct Admitted {
    pub client: String,
    pub remaining: u32,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Admitted {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let client = client_key(parts);

        match state.limiter.admit(&client) {
            Admission::Allowed { remaining } => Ok(Admitted { client, remaining }),
            Admission::Denied { retry_after } => {
                tracing::info!(client = %client, "admission denied");
                // round up so a client never retries into a still-closed window
                let retry_after_secs =
                    retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Err(ApiError::AdmissionDenied { retry_after_secs })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let parts = parts_with_headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(client_key(&parts), hash_ip("203.0.113.7"));
    }

    #[test]
    fn test_real_ip_header() {
        let parts = parts_with_headers(&[("x-real-ip", "2001:db8::1")]);
        assert_eq!(client_key(&parts), hash_ip("2001:db8::1"));
    }

    #[test]
    fn test_unidentifiable_caller_is_anonymous() {
        let parts = parts_with_headers(&[("x-forwarded-for", "not-an-ip")]);
        assert_eq!(client_key(&parts), ANONYMOUS_KEY);
    }

    #[test]
    fn test_hash_is_stable_and_opaque() {
        let a = hash_ip("198.51.100.2");
        assert_eq!(a, hash_ip("198.51.100.2"));
        assert_ne!(a, hash_ip("198.51.100.3"));
        assert_eq!(a.len(), 32);
    }
}
