//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Database path (SQLite), with or without a sqlite:// prefix
    pub database_url: String,

    /// Secret used to sign and verify auth tokens.
    /// No fallback: a missing APP_SECRET is a startup failure, not a
    /// per-request error.
    pub app_secret: String,

    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Auth token lifetime in seconds
    pub token_lifetime_secs: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "./data/linknest.db".to_string());

        let app_secret = env::var("APP_SECRET").context("APP_SECRET is required")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            app_secret,

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30 * 24 * 60 * 60),
        })
    }
}
