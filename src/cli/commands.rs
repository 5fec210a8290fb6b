//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::cli::{error, info, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Write a default agora.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set AGORA_SESSION_SECRET and WORDPRESS_URL, then run 'agora serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    if let Err(e) = config.validate() {
        error(&e.to_string());
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// Print the effective configuration
pub async fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| {
        error(&e.to_string());
        e.into()
    })
}
