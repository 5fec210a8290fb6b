//! Controller seam
//!
//! Route handlers consume controllers only through these traits. Every
//! operation answers with an explicit [`ControllerResult`]; operations whose
//! backend may legitimately answer nothing return `ControllerResult<Option<T>>`.

pub mod auth;
pub mod community;
pub mod feed;
pub mod notification;
pub mod user;

use std::sync::Arc;

use thiserror::Error;

pub use auth::AuthController;
pub use community::CommunityController;
pub use feed::FeedController;
pub use notification::NotificationController;
pub use user::UserController;

/// Failure reported by a controller; the message is shown to the client as-is
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ControllerError {
    pub message: String,
}

impl ControllerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ControllerResult<T> = std::result::Result<T, ControllerError>;

/// The set of controllers the API routes delegate to
#[derive(Clone)]
pub struct Controllers {
    pub auth: Arc<dyn AuthController>,
    pub community: Arc<dyn CommunityController>,
    pub feed: Arc<dyn FeedController>,
    pub notifications: Arc<dyn NotificationController>,
    pub user: Arc<dyn UserController>,
}

impl Controllers {
    /// Use one backend for every controller
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: AuthController
            + CommunityController
            + FeedController
            + NotificationController
            + UserController
            + 'static,
    {
        Self {
            auth: backend.clone(),
            community: backend.clone(),
            feed: backend.clone(),
            notifications: backend.clone(),
            user: backend,
        }
    }
}
