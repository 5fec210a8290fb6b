//! WordPress backend adapter

mod client;
pub mod dto;

pub use client::WordPressClient;
