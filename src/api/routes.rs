//! API route handlers
//!
//! Every authenticated handler follows the same steps: the [`CurrentSession`]
//! extractor resolves the caller (or answers 401 before anything else runs),
//! fields are read from the body, exactly one controller operation is called,
//! and its outcome is normalized by [`relay`], [`relay_or`] or [`acknowledge`].

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use super::fields::RequestFields;
use super::response::{acknowledge, relay, relay_or, Acknowledgement, ApiError, ApiResult};
use super::server::SharedState;
use crate::auth::{CurrentSession, LoginResponse};
use crate::models::{Community, Conversation, Message, Notification, Post};

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Session routes

pub async fn login(
    State(state): State<SharedState>,
    fields: RequestFields,
) -> Result<Response, ApiError> {
    let username = fields.require("username")?;
    let password = fields.require("password")?;

    let result = state.controllers.auth.login(username, password).await;
    let Json(login) = relay_or(result, "Unable to log in")?;

    let cookie = state.sessions.create_session(&login).map_err(|e| {
        tracing::error!("Failed to sign session: {}", e);
        ApiError::Internal
    })?;

    tracing::info!("User {} logged in", login.user.id);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { user: login.user }),
    )
        .into_response())
}

pub async fn logout(State(state): State<SharedState>) -> Response {
    tracing::info!("Session cleared");
    state.sessions.clear_session(&state.logout_redirect)
}

// Community routes

pub async fn get_all_communities(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Vec<Community>> {
    let result = state
        .controllers
        .community
        .get_all_communities(&session.token)
        .await;
    relay_or(result, "Unable to get communities")
}

pub async fn join_community(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Option<Value>> {
    let community_id = fields.require("communityId")?;
    let result = state
        .controllers
        .community
        .join_community(&session.token, &session.user.id, community_id)
        .await;
    relay(result)
}

pub async fn leave_community(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Acknowledgement> {
    let community_id = fields.require("communityId")?;
    let result = state
        .controllers
        .community
        .leave_community(&session.token, &session.user.id, community_id)
        .await;
    acknowledge(result, "Left community")
}

// Feed routes

pub async fn get_feed(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Vec<Post>> {
    let result = state
        .controllers
        .feed
        .get_feed(&session.token, fields.optional("page"))
        .await;
    relay_or(result, "Unable to get feed")
}

pub async fn get_all_saved_posts(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Vec<Post>> {
    let result = state
        .controllers
        .feed
        .get_all_saved_posts(&session.token, &session.user.id)
        .await;
    relay_or(result, "Unable to get saved posts")
}

pub async fn save_post(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Option<Value>> {
    let post_id = fields.require("postId")?;
    let result = state
        .controllers
        .feed
        .save_post(&session.token, &session.user.id, post_id)
        .await;
    relay(result)
}

pub async fn unsave_post(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Acknowledgement> {
    let post_id = fields.require("postId")?;
    let result = state
        .controllers
        .feed
        .unsave_post(&session.token, &session.user.id, post_id)
        .await;
    acknowledge(result, "Post removed from saved posts")
}

pub async fn share_post(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Value> {
    let post_id = fields.require("postId")?;
    let result = state
        .controllers
        .feed
        .share_post(&session.token, &session.user.id, post_id)
        .await;
    relay_or(result, "Unable to share post")
}

// Notification routes

pub async fn get_all_notifications(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Vec<Notification>> {
    let result = state
        .controllers
        .notifications
        .get_all_notifications(&session.token, &session.user.id)
        .await;
    relay_or(result, "Unable to get notifications")
}

pub async fn delete_notification(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Acknowledgement> {
    let notification_id = fields.require("notificationId")?;
    let result = state
        .controllers
        .notifications
        .delete_notification(&session.token, &session.user.id, notification_id)
        .await;
    acknowledge(result, "Notification deleted")
}

pub async fn delete_all_notifications(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Acknowledgement> {
    let result = state
        .controllers
        .notifications
        .delete_all_notifications(&session.token, &session.user.id)
        .await;
    acknowledge(result, "Notification deleted")
}

// User routes

pub async fn get_profile(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Value> {
    let result = state
        .controllers
        .user
        .get_profile(&session.token, &session.user.id)
        .await;
    relay_or(result, "Unable to get profile")
}

pub async fn get_message_conversations(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Vec<Conversation>> {
    let result = state
        .controllers
        .user
        .get_message_conversations(&session.token, &session.user.id)
        .await;
    relay_or(result, "Unable to get conversations")
}

pub async fn get_messages(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Vec<Message>> {
    let conversation_id = fields.require("conversationId")?;
    let result = state
        .controllers
        .user
        .get_messages(&session.token, conversation_id)
        .await;
    relay_or(result, "Unable to get messages")
}

pub async fn send_message(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    fields: RequestFields,
) -> ApiResult<Message> {
    let conversation_id = fields.require("conversationId")?;
    let message = fields.require("message")?;
    let result = state
        .controllers
        .user
        .send_message(&session.token, &session.user.id, conversation_id, message)
        .await;
    relay_or(result, "Unable to send message")
}
