//! Configuration management
//!
//! Settings come from the process environment, after loading `.env` if one
//! exists.

use anyhow::{Context, bail};
use chrono::Utc;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
/// Access token lifetime in minutes.
pub const DEFAULT_TOKEN_EXPIRATION: i64 = 60;

#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret_key: String,
    pub jwt_token_expiration: chrono::Duration,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("jwt_token_expiration", &self.jwt_token_expiration)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Load configuration from `.env` and the environment
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a value does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret_key = lookup("JWT_SECRET_KEY")
            .filter(|secret| !secret.is_empty())
            .context("JWT_SECRET_KEY must be set to a non-empty value")?;

        let minutes = match lookup("JWT_TOKEN_EXPIRATION") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("JWT_TOKEN_EXPIRATION is not a number: {raw}"))?,
            None => DEFAULT_TOKEN_EXPIRATION,
        };
        if minutes <= 0 {
            bail!("JWT_TOKEN_EXPIRATION must be a positive number of minutes");
        }
        let jwt_token_expiration = chrono::Duration::try_minutes(minutes)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .with_context(|| format!("JWT_TOKEN_EXPIRATION is too large: {minutes}"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            jwt_secret_key,
            jwt_token_expiration,
            debug: lookup("DEBUG").is_some_and(|raw| {
                matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
