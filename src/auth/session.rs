//! Signed cookie sessions
//!
//! A session is a session token (see [`crate::auth::jwt`]) carried in an
//! `HttpOnly` cookie. Nothing is stored server-side: creating a session signs
//! a token, reading one verifies it, and clearing one expires the cookie.

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::jwt::{create_token, validate_token, SessionClaims};
use crate::auth::middleware::session_token_candidates;
use crate::auth::models::{AuthenticatedUser, WordPressLogin};
use crate::config::{SameSite, SessionConfig, MAX_SESSION_TTL_MINUTES};
use crate::error::Result;

/// Session information resolved for one request
#[derive(Debug, Clone)]
pub struct Session {
    /// User associated with this session
    pub user: AuthenticatedUser,
    /// WordPress bearer token
    pub token: String,
    /// Unix timestamp at which the session ends
    pub expires_at: i64,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user: claims.user,
            token: claims.wp_token,
            expires_at: claims.exp,
        }
    }
}

/// Creates, reads and clears cookie sessions
#[derive(Clone)]
pub struct SessionStore {
    secret: Arc<[u8]>,
    cookie_name: String,
    ttl: chrono::Duration,
    secure: bool,
    same_site: SameSite,
}

impl SessionStore {
    /// Create a session store
    pub fn new(secret: impl Into<Vec<u8>>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            cookie_name: cookie_name.into(),
            ttl: chrono::Duration::days(7),
            secure: false,
            same_site: SameSite::Lax,
        }
    }

    /// Create a session store from configuration; the TTL is clamped to the
    /// range `Config::validate` accepts
    pub fn from_config(config: &SessionConfig) -> Self {
        let ttl_minutes = config.ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES);
        Self::new(config.secret.as_bytes(), config.cookie_name.clone())
            .with_ttl(chrono::Duration::minutes(ttl_minutes))
            .with_secure(config.secure)
            .with_same_site(config.same_site)
    }

    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a session for a logged-in user; returns the `Set-Cookie` value
    pub fn create_session(&self, login: &WordPressLogin) -> Result<String> {
        let claims = SessionClaims::new(
            login.user.clone(),
            login.token.clone(),
            self.ttl,
            login.expires_at,
        );
        let token = self.sign(&claims)?;
        Ok(self.session_cookie(&token, claims.remaining_seconds()))
    }

    /// Sign session claims into a session token
    pub fn sign(&self, claims: &SessionClaims) -> Result<String> {
        create_token(&self.secret, claims)
    }

    /// Resolve the session carried by a request, if any.
    ///
    /// The first candidate token that validates wins.
    pub fn get_user_from_session(&self, headers: &HeaderMap) -> Option<Session> {
        session_token_candidates(headers, &self.cookie_name)
            .into_iter()
            .find_map(|token| match validate_token(&self.secret, token) {
                Ok(claims) => Some(claims.into()),
                Err(e) => {
                    tracing::debug!("Rejected session token: {}", e);
                    None
                }
            })
    }

    /// Expire the session cookie and redirect
    pub fn clear_session(&self, redirect_to: &str) -> Response {
        (
            [(header::SET_COOKIE, self.expired_cookie())],
            Redirect::to(redirect_to),
        )
            .into_response()
    }

    fn session_cookie(&self, token: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
            self.cookie_name,
            token,
            self.same_site.as_str(),
            max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn expired_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite={}; Max-Age=0",
            self.cookie_name,
            self.same_site.as_str()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
