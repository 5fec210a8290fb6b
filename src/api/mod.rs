//! HTTP API server

pub mod fields;
pub mod response;
pub mod routes;
pub mod server;

pub use server::*;
