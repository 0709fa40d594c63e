use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Fallback signing secret for local development only. Production refuses
/// to start without an explicit `SESSION_SECRET`.
const DEV_SESSION_SECRET: &str = "bazaar-dev-secret-do-not-use-in-production";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The secret used to sign and verify session credentials.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// Whether the server runs in production mode.
    pub is_production: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let is_production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => Zeroizing::new(secret.into_bytes()),
            _ if is_production => {
                anyhow::bail!("SESSION_SECRET must be set in production (generate with: openssl rand -hex 32)");
            }
            _ => {
                tracing::warn!("⚠️ SESSION_SECRET not set, using the development default");
                Zeroizing::new(DEV_SESSION_SECRET.as_bytes().to_vec())
            }
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            session_secret,
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            is_production,
        })
    }
}
