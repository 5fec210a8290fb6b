//! Reqwest-backed WordPress adapter.
//!
//! Implements every controller trait over the WordPress REST API. The adapter
//! owns transport details only: URL building, bearer forwarding, status and
//! error-body mapping, and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::dto::{CurrentUserDto, TokenResponseDto, WordPressErrorDto};
use crate::auth::{decode_wordpress_token, WordPressLogin};
use crate::config::WordPressConfig;
use crate::controllers::{
    AuthController, CommunityController, ControllerError, ControllerResult, FeedController,
    NotificationController, UserController,
};
use crate::error::{Error, Result};
use crate::models::{Community, Conversation, Message, Notification, Post};

const USER_AGENT: &str = concat!("agora/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one WordPress site
pub struct WordPressClient {
    client: Client,
    api_url: Url,
    namespace: Vec<String>,
    jwt_secret: Option<String>,
}

impl WordPressClient {
    /// Build a client with the configured site, namespace and timeout
    pub fn new(config: &WordPressConfig) -> Result<Self> {
        let api_url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.api_root.trim_matches('/')
        );
        let api_url = Url::parse(&api_url)
            .map_err(|e| Error::Config(format!("Invalid WordPress URL '{}': {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "WordPress URL '{}' cannot carry a path",
                api_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url,
            namespace: config
                .namespace
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            jwt_secret: config.signing_secret().map(str::to_string),
        })
    }

    /// URL below the REST API root, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> ControllerResult<Url> {
        self.build_url(false, segments)
    }

    /// URL below the community plugin namespace
    fn namespaced(&self, segments: &[&str]) -> ControllerResult<Url> {
        self.build_url(true, segments)
    }

    fn build_url(&self, namespaced: bool, segments: &[&str]) -> ControllerResult<Url> {
        let mut url = self.api_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ControllerError::new("WordPress URL cannot carry a path"))?;
            path.pop_if_empty();
            if namespaced {
                path.extend(self.namespace.iter());
            }
            path.extend(segments.iter().copied());
        }
        Ok(url)
    }

    /// Send a request and decode its JSON body; an empty or `null` body is `None`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ControllerResult<Option<T>> {
        let body = self.execute(request).await?;
        decode_body(&body)
    }

    /// Send a request whose body, if any, is not used
    async fn send_unit(&self, request: RequestBuilder) -> ControllerResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> ControllerResult<Vec<u8>> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(body.to_vec())
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ControllerResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(body)
        .map_err(|e| ControllerError::new(format!("Invalid response from WordPress: {}", e)))
}

fn map_transport_error(error: reqwest::Error) -> ControllerError {
    tracing::warn!("WordPress request failed: {}", error);
    if error.is_timeout() {
        ControllerError::new("WordPress request timed out")
    } else {
        ControllerError::new(format!("Unable to reach WordPress: {}", error))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ControllerError {
    match serde_json::from_slice::<WordPressErrorDto>(body) {
        Ok(error) => {
            tracing::debug!(
                "WordPress answered {} ({})",
                status,
                error.code.as_deref().unwrap_or("no code")
            );
            ControllerError::new(error.message)
        }
        Err(_) => ControllerError::new(format!(
            "WordPress request failed with status {}",
            status.as_u16()
        )),
    }
}

#[async_trait]
impl AuthController for WordPressClient {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> ControllerResult<Option<WordPressLogin>> {
        let url = self.url(&["jwt-auth", "v1", "token"])?;
        let request = self
            .client
            .post(url)
            .form(&[("username", username), ("password", password)]);
        let Some(token) = self.send::<TokenResponseDto>(request).await? else {
            return Ok(None);
        };

        let mut url = self.url(&["wp", "v2", "users", "me"])?;
        url.query_pairs_mut().append_pair("context", "edit");
        let request = self.client.get(url).bearer_auth(&token.token);
        let Some(me) = self.send::<CurrentUserDto>(request).await? else {
            return Ok(None);
        };

        let claims = decode_wordpress_token(&token.token, self.jwt_secret.as_deref())
            .map_err(|e| ControllerError::new(format!("Invalid WordPress token: {}", e)))?;
        if claims.user_id() != me.id {
            return Err(ControllerError::new(
                "WordPress token does not belong to the current user",
            ));
        }

        let user = me.into_user(&token);
        Ok(Some(WordPressLogin {
            token: token.token,
            user,
            expires_at: Some(claims.exp),
        }))
    }
}

#[async_trait]
impl CommunityController for WordPressClient {
    async fn get_all_communities(&self, token: &str) -> ControllerResult<Option<Vec<Community>>> {
        let url = self.namespaced(&["communities"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn join_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let url = self.namespaced(&["communities", community_id, "members"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "user_id": user_id }));
        self.send(request).await
    }

    async fn leave_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<()> {
        let url = self.namespaced(&["communities", community_id, "members", user_id])?;
        self.send_unit(self.client.delete(url).bearer_auth(token)).await
    }
}

#[async_trait]
impl FeedController for WordPressClient {
    async fn get_feed(&self, token: &str, page: Option<&str>) -> ControllerResult<Option<Vec<Post>>> {
        let mut url = self.namespaced(&["feed"])?;
        if let Some(page) = page {
            url.query_pairs_mut().append_pair("page", page);
        }
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn get_all_saved_posts(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Post>>> {
        let url = self.namespaced(&["users", user_id, "saved-posts"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn save_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let url = self.namespaced(&["users", user_id, "saved-posts"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "post_id": post_id }));
        self.send(request).await
    }

    async fn unsave_post(&self, token: &str, user_id: &str, post_id: &str) -> ControllerResult<()> {
        let url = self.namespaced(&["users", user_id, "saved-posts", post_id])?;
        self.send_unit(self.client.delete(url).bearer_auth(token)).await
    }

    async fn share_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let url = self.namespaced(&["posts", post_id, "share"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "user_id": user_id }));
        self.send(request).await
    }
}

#[async_trait]
impl NotificationController for WordPressClient {
    async fn get_all_notifications(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Notification>>> {
        let url = self.namespaced(&["users", user_id, "notifications"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn delete_notification(
        &self,
        token: &str,
        user_id: &str,
        notification_id: &str,
    ) -> ControllerResult<()> {
        let url = self.namespaced(&["users", user_id, "notifications", notification_id])?;
        self.send_unit(self.client.delete(url).bearer_auth(token)).await
    }

    async fn delete_all_notifications(&self, token: &str, user_id: &str) -> ControllerResult<()> {
        let url = self.namespaced(&["users", user_id, "notifications"])?;
        self.send_unit(self.client.delete(url).bearer_auth(token)).await
    }
}

#[async_trait]
impl UserController for WordPressClient {
    async fn get_profile(&self, token: &str, user_id: &str) -> ControllerResult<Option<Value>> {
        let url = self.namespaced(&["users", user_id, "profile"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn get_message_conversations(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Conversation>>> {
        let url = self.namespaced(&["users", user_id, "conversations"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn get_messages(
        &self,
        token: &str,
        conversation_id: &str,
    ) -> ControllerResult<Option<Vec<Message>>> {
        let url = self.namespaced(&["conversations", conversation_id, "messages"])?;
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn send_message(
        &self,
        token: &str,
        user_id: &str,
        conversation_id: &str,
        message: &str,
    ) -> ControllerResult<Option<Message>> {
        let url = self.namespaced(&["conversations", conversation_id, "messages"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "user_id": user_id, "message": message }));
        self.send(request).await
    }
}
