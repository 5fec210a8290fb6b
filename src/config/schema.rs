//! Configuration schema definitions

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub wordpress: WordPressConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.session.secret.trim().is_empty() {
            return Err(Error::Config(
                "session.secret must be set to a non-empty value".to_string(),
            ));
        }
        if self.wordpress.base_url.trim().is_empty() {
            return Err(Error::Config("wordpress.base_url must be set".to_string()));
        }
        if self.wordpress.timeout_secs == 0 {
            return Err(Error::Config(
                "wordpress.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.session.ttl_minutes) {
            return Err(Error::Config(format!(
                "session.ttl_minutes must be between 1 and {}",
                MAX_SESSION_TTL_MINUTES
            )));
        }
        if self.session.same_site == SameSite::None && !self.session.secure {
            return Err(Error::Config(
                "session.same_site = \"none\" requires session.secure = true".to_string(),
            ));
        }
        self.server.allowed_origins()?;
        Ok(())
    }

    /// Copy of the configuration with secrets blanked out, for display
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        if !config.session.secret.is_empty() {
            config.session.secret = REDACTED.to_string();
        }
        if config.wordpress.signing_secret().is_some() {
            config.wordpress.jwt_secret = Some(REDACTED.to_string());
        }
        config
    }
}

const REDACTED: &str = "********";

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API with credentials. Empty means
    /// same-origin only and no CORS headers are sent.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Parse `cors_origins` into header values; `*` is refused because
    /// credentialed requests cannot use a wildcard origin
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>> {
        self.cors_origins
            .iter()
            .map(|origin| {
                let origin = origin.trim().trim_end_matches('/');
                if origin.is_empty() || origin == "*" {
                    return Err(Error::Config(format!(
                        "server.cors_origins entry '{}' must be an explicit origin",
                        origin
                    )));
                }
                HeaderValue::from_str(origin).map_err(|e| {
                    Error::Config(format!("Invalid CORS origin '{}': {}", origin, e))
                })
            })
            .collect()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3456
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// WordPress backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressConfig {
    /// Site URL, e.g. `https://community.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// REST API root below the site URL
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// REST namespace of the community plugin
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-request timeout for backend calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Secret of the WordPress JWT plugin. When set, token signatures are
    /// verified at login; otherwise only the claims are read.
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

impl WordPressConfig {
    /// The JWT plugin secret, if one is actually set. A blank value (e.g. an
    /// unset environment variable) counts as no secret.
    pub fn signing_secret(&self) -> Option<&str> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_root() -> String {
    "/wp-json".to_string()
}

fn default_namespace() -> String {
    "social/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_root: default_api_root(),
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
            jwt_secret: None,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// HMAC secret used to sign session tokens
    #[serde(default)]
    pub secret: String,

    /// Session lifetime; capped by the WordPress token expiry
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Mark the cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure: bool,

    /// `SameSite` attribute of the cookie; `none` lets cross-site clients
    /// send it and needs `secure`
    #[serde(default)]
    pub same_site: SameSite,

    /// Where `/logout` sends the browser
    #[serde(default = "default_logout_redirect")]
    pub logout_redirect: String,
}

/// Cookie `SameSite` policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

fn default_cookie_name() -> String {
    "agora_session".to_string()
}

fn default_ttl_minutes() -> i64 {
    60 * 24 * 7
}

fn default_logout_redirect() -> String {
    "/".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secret: String::new(),
            ttl_minutes: default_ttl_minutes(),
            secure: false,
            same_site: SameSite::default(),
            logout_redirect: default_logout_redirect(),
        }
    }
}
