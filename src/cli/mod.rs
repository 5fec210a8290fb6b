//! CLI interface for Agora

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agora")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Authenticated API gateway for a WordPress community", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default agora.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long, env = "AGORA_HOST")]
        host: Option<String>,

        /// Port to listen on (defaults to server.port)
        #[arg(short, long, env = "AGORA_PORT")]
        port: Option<u16>,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}
