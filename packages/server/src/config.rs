//! Server configuration from environment variables.

use anyhow::{Context, Result};

/// Ceiling on the text sent to the model per extraction, in characters.
/// Keeps the prompt inside the model's context window.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// SQLite connection URL
    pub database_url: String,

    /// Per-request extraction input ceiling, in characters
    pub max_content_chars: usize,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Model credentials (`MOONSHOT_API_KEY`, `BGE_API_KEY`) are read by the
    /// client constructors, not here.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().context("PORT is not a valid port number")?,
            Err(_) => 8001,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://knowledge.db?mode=rwc".to_string());

        let max_content_chars = match std::env::var("MAX_CONTENT_CHARS") {
            Ok(value) => value
                .parse()
                .context("MAX_CONTENT_CHARS is not a valid number")?,
            Err(_) => DEFAULT_MAX_CONTENT_CHARS,
        };

        Ok(Self {
            port,
            database_url,
            max_content_chars,
        })
    }
}
