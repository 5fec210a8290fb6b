//! Authentication extractors

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};

use crate::api::response::ApiError;
use crate::auth::session::{Session, SessionStore};

/// Collect the session token candidates of a request, in lookup order.
///
/// An `Authorization: Bearer` header comes first so that non-browser clients
/// can present the same token; the session cookie follows. A bearer token
/// that is not a session token (e.g. a WordPress token) must not hide the
/// cookie, so every candidate is returned.
pub fn session_token_candidates<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Vec<&'a str> {
    let mut candidates = Vec::new();

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    candidates.push(token);
                }
            }
        }
    }

    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = cookie_header.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == cookie_name && !value.is_empty() {
                    candidates.push(value);
                }
            }
        }
    }

    candidates
}

/// Extractor for the caller's session.
///
/// Rejects with `401 { "error": "UNAUTHORIZED" }` before any other extractor
/// or handler code runs when the request carries no valid session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        store
            .get_user_from_session(&parts.headers)
            .map(CurrentSession)
            .ok_or(ApiError::Unauthorized)
    }
}
