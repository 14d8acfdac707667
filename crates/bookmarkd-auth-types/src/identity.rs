//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::{HeaderMap, StatusCode};
use http::request::Parts;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-bookmarkd-user-id";

/// User identity injected by the gateway via `x-bookmarkd-user-id`.
///
/// Returns 401 if the header is absent or is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: i32,
}

/// Identity for endpoints where authentication is optional.
///
/// Never rejects: a missing or malformed header yields an anonymous viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionalIdentity(pub Option<IdentityHeaders>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|identity| identity.user_id)
    }
}

/// Read the gateway-injected user id from raw headers.
///
/// For middleware that runs before extractors; handlers use the extractors.
pub fn user_id_from_headers(headers: &HeaderMap) -> Option<i32> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|id| *id > 0)
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = user_id_from_headers(&parts.headers);
        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id })
        }
    }
}

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity =
            user_id_from_headers(&parts.headers).map(|user_id| IdentityHeaders { user_id });
        async move { Ok(Self(identity)) }
    }
}
