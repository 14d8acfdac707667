//! Read-through response cache for cacheable GET routes.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use bookmarkd_auth_types::identity::user_id_from_headers;

use crate::domain::cache::{cache_key, policy_for};
use crate::domain::repository::ResponseCache;

pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Serve cached JSON on a hit; store `200 OK` responses on a miss.
///
/// Cache errors never fail the request.
pub async fn response_cache<C>(State(cache): State<C>, request: Request, next: Next) -> Response
where
    C: ResponseCache + Clone + 'static,
{
    if !cache.enabled() || request.method() != Method::GET {
        return next.run(request).await;
    }
    let Some(policy) = policy_for(request.uri().path()) else {
        return next.run(request).await;
    };

    let viewer_id = user_id_from_headers(request.headers());
    let key = cache_key(
        policy.scope,
        viewer_id,
        request.uri().path(),
        request.uri().query(),
    );

    match cache.get(&key).await {
        Ok(Some(body)) => {
            tracing::debug!(key = %key, "response cache hit");
            return cached_json(body, "HIT");
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = ?e, key = %key, "response cache read failed"),
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    match std::str::from_utf8(&bytes) {
        Ok(text) => {
            if let Err(e) = cache.set(&key, text, policy.ttl_secs).await {
                tracing::warn!(error = ?e, key = %key, "response cache write failed");
            }
        }
        Err(_) => tracing::warn!(key = %key, "skipping non-utf8 response body"),
    }
    parts
        .headers
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

fn cached_json(body: String, status: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (
                header::HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static(status),
            ),
        ],
        body,
    )
        .into_response()
}
