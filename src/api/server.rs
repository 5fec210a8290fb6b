//! HTTP API server

use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::controllers::Controllers;
use crate::error::Result;
use crate::wordpress::WordPressClient;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub sessions: SessionStore,
    pub controllers: Controllers,
    /// Where `/logout` sends the browser
    pub logout_redirect: String,
    /// Cross-origin callers allowed to send the session cookie
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppState {
    pub fn new(sessions: SessionStore, controllers: Controllers) -> Self {
        Self {
            sessions,
            controllers,
            logout_redirect: "/".to_string(),
            allowed_origins: Vec::new(),
        }
    }

    /// Wire the WordPress adapter and session store from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(WordPressClient::new(&config.wordpress)?);
        Ok(Self {
            sessions: SessionStore::from_config(&config.session),
            controllers: Controllers::from_backend(backend),
            logout_redirect: config.session.logout_redirect.clone(),
            allowed_origins: config.server.allowed_origins()?,
        })
    }

    pub fn with_logout_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.logout_redirect = redirect.into();
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<HeaderValue>) -> Self {
        self.allowed_origins = origins;
        self
    }
}

pub type SharedState = Arc<AppState>;

impl FromRef<SharedState> for SessionStore {
    fn from_ref(state: &SharedState) -> Self {
        state.sessions.clone()
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        "Server listening on {}, backend {}",
        addr,
        config.wordpress.base_url
    );

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let router = Router::new()
        .route("/api/health", get(routes::health))
        // Session routes
        .route("/login", post(routes::login))
        .route("/logout", get(routes::logout).post(routes::logout))
        // Community routes
        .route("/api/community/getAll", post(routes::get_all_communities))
        .route("/api/community/join", post(routes::join_community))
        .route("/api/community/leave", post(routes::leave_community))
        // Feed routes
        .route("/api/feed/getFeed", post(routes::get_feed))
        .route("/api/feed/getAllSavedPosts", post(routes::get_all_saved_posts))
        .route("/api/feed/savePost", post(routes::save_post))
        .route("/api/feed/unsavePost", post(routes::unsave_post))
        .route("/api/post/share", post(routes::share_post))
        // Notification routes
        .route("/api/notification/getAll", post(routes::get_all_notifications))
        .route("/api/notification/delete", post(routes::delete_notification))
        .route("/api/notification/deleteAll", post(routes::delete_all_notifications))
        // User routes
        .route("/api/user/getProfile", post(routes::get_profile))
        .route(
            "/api/user/getMessageConversations",
            post(routes::get_message_conversations),
        )
        .route("/api/user/getMessages", post(routes::get_messages))
        .route("/api/user/sendMessage", post(routes::send_message))
        // Middleware
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors).with_state(state),
        None => router.with_state(state),
    }
}

/// Credentialed CORS for the configured origins; none when same-origin only
fn cors_layer(origins: &[HeaderValue]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}
