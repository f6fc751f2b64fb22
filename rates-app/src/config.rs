//! Configuration loading from environment.

use std::env;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub pool_size: u32,
    pub env: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `DATABASE_URL` wins when set; otherwise the URL is composed from the
    /// individual `DATABASE_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => compose_database_url()?,
        };

        let pool_size = env::var("DATABASE_POOL")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?;

        let env = env::var("ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            port,
            database_url,
            pool_size,
            env,
        })
    }

    /// Whether credentials and connection details may be logged.
    pub fn is_local(&self) -> bool {
        matches!(self.env.as_str(), "development" | "staging")
    }
}

fn compose_database_url() -> anyhow::Result<String> {
    let require = |key: &str| {
        env::var(key).map_err(|_| anyhow::anyhow!("{key} (or DATABASE_URL) must be set"))
    };

    let username = require("DATABASE_USERNAME")?;
    let password = require("DATABASE_PASSWORD")?;
    let host = require("DATABASE_HOST")?;
    let name = require("DATABASE_NAME")?;
    let port = env::var("DATABASE_PORT").unwrap_or_else(|_| "5432".to_string());

    Ok(format!(
        "postgres://{username}:{password}@{host}:{port}/{name}"
    ))
}
