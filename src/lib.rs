//! Agora - authenticated API gateway for a WordPress-backed community app
//!
//! This is the library interface for Agora: the HTTP routes, the cookie
//! session store, the controller traits the routes delegate to, and the
//! WordPress adapter implementing them.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod wordpress;

pub use config::Config;
pub use error::Error;
