//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "agora.toml";

/// Load configuration from agora.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;
    find_config_file_from(current)
}

fn find_config_file_from(mut current: PathBuf) -> Result<PathBuf> {
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Agora Configuration

[server]
host = "0.0.0.0"
port = 3456
# Browser origins allowed to call the API with the session cookie
# cors_origins = ["https://app.example.com"]

[wordpress]
base_url = "${WORDPRESS_URL:-http://localhost:8080}"
api_root = "/wp-json"
namespace = "social/v1"
timeout_secs = 30
# Secret of the WordPress JWT plugin (JWT_AUTH_SECRET_KEY). When set, token
# signatures are verified at login.
# jwt_secret = "${JWT_AUTH_SECRET_KEY}"

[session]
cookie_name = "agora_session"
secret = "${AGORA_SESSION_SECRET}"
ttl_minutes = 10080
secure = false
# "strict", "lax" or "none"; "none" (cross-site clients) needs secure = true
same_site = "lax"
logout_redirect = "/"
"#
}
