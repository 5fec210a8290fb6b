//! JWT token handling
//!
//! Two kinds of token pass through here: the session token this server signs
//! and stores in the session cookie, and the bearer token issued by the
//! WordPress JWT plugin, whose claims are read at login.

use crate::auth::models::AuthenticatedUser;
use crate::error::{Error, Result};
use crate::models::deserialize_id;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (WordPress user ID)
    pub sub: String,
    /// Caller identity
    pub user: AuthenticatedUser,
    /// WordPress bearer token forwarded on backend calls
    pub wp_token: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims valid for `ttl`, never outliving `not_after` when given
    pub fn new(
        user: AuthenticatedUser,
        wp_token: String,
        ttl: chrono::Duration,
        not_after: Option<i64>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        let mut exp = now + ttl.num_seconds();
        if let Some(limit) = not_after {
            exp = exp.min(limit);
        }
        Self {
            sub: user.id.clone(),
            user,
            wp_token,
            iat: now,
            exp,
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }

    /// Seconds until expiry, zero once expired
    pub fn remaining_seconds(&self) -> i64 {
        (self.exp - chrono::Utc::now().timestamp()).max(0)
    }
}

/// Sign a session token
pub fn create_token(secret: &[u8], claims: &SessionClaims) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| Error::Config(format!("Failed to create token: {}", e)))
}

/// Validate and decode a session token; a token past `exp` is rejected
/// without leeway
pub fn validate_token(secret: &[u8], token: &str) -> Result<SessionClaims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
    .map(|data| data.claims)
    .map_err(Error::Token)
}

/// Claims of a token issued by the WordPress JWT plugin
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WordPressClaims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
    pub data: WordPressClaimsData,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WordPressClaimsData {
    pub user: WordPressClaimsUser,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WordPressClaimsUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

impl WordPressClaims {
    pub fn user_id(&self) -> &str {
        &self.data.user.id
    }
}

/// Read the claims of a WordPress token.
///
/// With a secret the HS256 signature is verified. Without one the token is
/// trusted as far as WordPress accepts it, and only expiry is checked here.
pub fn decode_wordpress_token(token: &str, secret: Option<&str>) -> Result<WordPressClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    let key = match secret {
        Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
        None => {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        }
    };

    decode::<WordPressClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(Error::Token)
}
