//! Authentication models

use serde::{Deserialize, Serialize};

/// Identity of the caller, projected from the WordPress user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// WordPress user ID
    pub id: String,
    /// Login name
    pub login: String,
    pub display_name: String,
    pub email: String,
    /// WordPress roles, e.g. `administrator`, `subscriber`
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if the user holds a WordPress role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if the user is a site administrator
    pub fn is_admin(&self) -> bool {
        self.has_role("administrator")
    }
}

/// Outcome of a successful login against WordPress
#[derive(Debug, Clone)]
pub struct WordPressLogin {
    /// Bearer token issued by the WordPress JWT plugin
    pub token: String,
    pub user: AuthenticatedUser,
    /// Unix timestamp after which WordPress rejects the token
    pub expires_at: Option<i64>,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AuthenticatedUser,
}
