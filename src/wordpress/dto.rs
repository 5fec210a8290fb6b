//! Wire shapes of WordPress responses that are consumed, not relayed

use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::models::deserialize_id;

/// Error body of the WordPress REST API, e.g.
/// `{"code":"rest_forbidden","message":"Sorry, you are not allowed to do that.","data":{"status":403}}`
#[derive(Debug, Deserialize)]
pub struct WordPressErrorDto {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Response of `POST /jwt-auth/v1/token`
#[derive(Debug, Deserialize)]
pub struct TokenResponseDto {
    pub token: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_nicename: Option<String>,
    #[serde(default)]
    pub user_display_name: Option<String>,
}

/// Response of `GET /wp/v2/users/me?context=edit`
#[derive(Debug, Deserialize)]
pub struct CurrentUserDto {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl CurrentUserDto {
    /// Merge with the token response; `users/me` wins where both carry a field
    pub fn into_user(self, token: &TokenResponseDto) -> AuthenticatedUser {
        AuthenticatedUser {
            login: self
                .username
                .or_else(|| token.user_nicename.clone())
                .unwrap_or_default(),
            display_name: self
                .name
                .or_else(|| token.user_display_name.clone())
                .unwrap_or_default(),
            email: self
                .email
                .or_else(|| token.user_email.clone())
                .unwrap_or_default(),
            id: self.id,
            roles: self.roles,
        }
    }
}
