//! Shared helpers for API tests: a stub backend that records calls, and a
//! server bound to an ephemeral port.

#![allow(dead_code)]

use agora::api::{serve, AppState};
use agora::auth::{AuthenticatedUser, SessionStore, WordPressLogin};
use agora::controllers::{
    AuthController, CommunityController, ControllerError, ControllerResult, Controllers,
    FeedController, NotificationController, UserController,
};
use agora::models::{Community, Conversation, Message, Notification, Post};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const SESSION_SECRET: &str = "integration-test-secret";
pub const COOKIE_NAME: &str = "agora_session";

/// What every stubbed operation answers
#[derive(Debug, Clone)]
pub enum Outcome {
    Value,
    Empty,
    Fail(String),
}

/// A recorded controller call: operation name and its arguments (token excluded)
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: String,
    pub args: Vec<String>,
    pub token: String,
}

pub struct StubBackend {
    outcome: Mutex<Outcome>,
    calls: Mutex<Vec<Call>>,
}

impl StubBackend {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, operation: &str, token: &str, args: &[&str]) -> Outcome {
        self.calls.lock().unwrap().push(Call {
            operation: operation.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            token: token.to_string(),
        });
        self.outcome.lock().unwrap().clone()
    }

    fn answer<T: DeserializeOwned>(outcome: Outcome, value: Value) -> ControllerResult<Option<T>> {
        match outcome {
            Outcome::Value => Ok(Some(serde_json::from_value(value).unwrap())),
            Outcome::Empty => Ok(None),
            Outcome::Fail(message) => Err(ControllerError::new(message)),
        }
    }

    fn answer_unit(outcome: Outcome) -> ControllerResult<()> {
        match outcome {
            Outcome::Value | Outcome::Empty => Ok(()),
            Outcome::Fail(message) => Err(ControllerError::new(message)),
        }
    }
}

pub fn test_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_string(),
        login: "alice".to_string(),
        display_name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        roles: vec!["subscriber".to_string()],
    }
}

#[async_trait]
impl AuthController for StubBackend {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> ControllerResult<Option<WordPressLogin>> {
        match self.record("login", "", &[username, password]) {
            Outcome::Value => Ok(Some(WordPressLogin {
                token: "wp-token-42".to_string(),
                user: test_user("42"),
                expires_at: None,
            })),
            Outcome::Empty => Ok(None),
            Outcome::Fail(message) => Err(ControllerError::new(message)),
        }
    }
}

#[async_trait]
impl CommunityController for StubBackend {
    async fn get_all_communities(&self, token: &str) -> ControllerResult<Option<Vec<Community>>> {
        let outcome = self.record("get_all_communities", token, &[]);
        Self::answer(outcome, json!([{ "id": 3, "name": "Gardeners" }]))
    }

    async fn join_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let outcome = self.record("join_community", token, &[user_id, community_id]);
        Self::answer(outcome, json!({ "joined": true }))
    }

    async fn leave_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<()> {
        Self::answer_unit(self.record("leave_community", token, &[user_id, community_id]))
    }
}

#[async_trait]
impl FeedController for StubBackend {
    async fn get_feed(&self, token: &str, page: Option<&str>) -> ControllerResult<Option<Vec<Post>>> {
        let outcome = self.record("get_feed", token, &[page.unwrap_or("")]);
        Self::answer(outcome, json!([{ "id": 1001, "title": "Hello" }]))
    }

    async fn get_all_saved_posts(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Post>>> {
        let outcome = self.record("get_all_saved_posts", token, &[user_id]);
        Self::answer(outcome, json!([{ "id": 1001, "title": "Saved" }]))
    }

    async fn save_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let outcome = self.record("save_post", token, &[user_id, post_id]);
        Self::answer(outcome, json!({ "saved": true }))
    }

    async fn unsave_post(&self, token: &str, user_id: &str, post_id: &str) -> ControllerResult<()> {
        Self::answer_unit(self.record("unsave_post", token, &[user_id, post_id]))
    }

    async fn share_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>> {
        let outcome = self.record("share_post", token, &[user_id, post_id]);
        Self::answer(outcome, json!({ "shared": true }))
    }
}

#[async_trait]
impl NotificationController for StubBackend {
    async fn get_all_notifications(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Notification>>> {
        let outcome = self.record("get_all_notifications", token, &[user_id]);
        Self::answer(outcome, json!([{ "id": 9, "message": "New reply", "read": false }]))
    }

    async fn delete_notification(
        &self,
        token: &str,
        user_id: &str,
        notification_id: &str,
    ) -> ControllerResult<()> {
        Self::answer_unit(self.record("delete_notification", token, &[user_id, notification_id]))
    }

    async fn delete_all_notifications(&self, token: &str, user_id: &str) -> ControllerResult<()> {
        Self::answer_unit(self.record("delete_all_notifications", token, &[user_id]))
    }
}

#[async_trait]
impl UserController for StubBackend {
    async fn get_profile(&self, token: &str, user_id: &str) -> ControllerResult<Option<Value>> {
        let outcome = self.record("get_profile", token, &[user_id]);
        Self::answer(outcome, json!({ "id": 42, "bio": "Gardener" }))
    }

    async fn get_message_conversations(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Conversation>>> {
        let outcome = self.record("get_message_conversations", token, &[user_id]);
        Self::answer(outcome, json!([{ "id": 5, "participants": [42, 43] }]))
    }

    async fn get_messages(
        &self,
        token: &str,
        conversation_id: &str,
    ) -> ControllerResult<Option<Vec<Message>>> {
        let outcome = self.record("get_messages", token, &[conversation_id]);
        Self::answer(outcome, json!([{ "id": 77, "sender": 43, "message": "Hi" }]))
    }

    async fn send_message(
        &self,
        token: &str,
        user_id: &str,
        conversation_id: &str,
        message: &str,
    ) -> ControllerResult<Option<Message>> {
        let outcome = self.record("send_message", token, &[user_id, conversation_id, message]);
        Self::answer(outcome, json!({ "id": 78, "sender": 42, "message": message }))
    }
}

pub fn session_store() -> SessionStore {
    SessionStore::new(SESSION_SECRET, COOKIE_NAME)
}

/// A running server backed by a stub
pub struct TestServer {
    pub base_url: String,
    pub stub: Arc<StubBackend>,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(outcome: Outcome) -> Self {
        Self::start_with(outcome, |state| state).await
    }

    /// Start with extra adjustments to the application state
    pub async fn start_with(outcome: Outcome, adjust: impl FnOnce(AppState) -> AppState) -> Self {
        let stub = StubBackend::new(outcome);
        let state = adjust(
            AppState::new(session_store(), Controllers::from_backend(stub.clone()))
                .with_logout_redirect("/login"),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = serve(listener, Arc::new(state)).await;
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: format!("http://{}", addr),
            stub,
            client,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a form body with a valid session for `user_id`
    pub async fn post_as(
        &self,
        user_id: &str,
        path: &str,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header(reqwest::header::COOKIE, session_cookie(user_id))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// POST a form body without any session
    pub async fn post_anonymous(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// `name=value` cookie pair for a valid session
pub fn session_cookie(user_id: &str) -> String {
    let login = WordPressLogin {
        token: format!("wp-token-{}", user_id),
        user: test_user(user_id),
        expires_at: None,
    };
    let set_cookie = session_store().create_session(&login).unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Every authenticated route with a body that satisfies its required fields
pub const AUTHENTICATED_ROUTES: &[(&str, &[(&str, &str)])] = &[
    ("/api/community/getAll", &[]),
    ("/api/community/join", &[("communityId", "3")]),
    ("/api/community/leave", &[("communityId", "3")]),
    ("/api/feed/getFeed", &[]),
    ("/api/feed/getAllSavedPosts", &[]),
    ("/api/feed/savePost", &[("postId", "1001")]),
    ("/api/feed/unsavePost", &[("postId", "1001")]),
    ("/api/post/share", &[("postId", "1001")]),
    ("/api/notification/getAll", &[]),
    ("/api/notification/delete", &[("notificationId", "9")]),
    ("/api/notification/deleteAll", &[]),
    ("/api/user/getProfile", &[]),
    ("/api/user/getMessageConversations", &[]),
    ("/api/user/getMessages", &[("conversationId", "5")]),
    (
        "/api/user/sendMessage",
        &[("conversationId", "5"), ("message", "Hello")],
    ),
];
