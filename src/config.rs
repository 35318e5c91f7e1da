//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `MAIL_RELAY_URL` (optional): mail relay receiving ride confirmations.
///   Without it confirmations are only logged.
/// - `MAIL_RELAY_SECRET` (optional): HMAC key for signing relay requests
/// - `MAIL_FROM` (optional): sender address, defaults to `no-reply@sharingyatra.app`
/// - `MAIL_TIMEOUT_SECS` (optional): relay request timeout, defaults to 5
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub mail_relay_url: Option<String>,

    #[serde(default)]
    pub mail_relay_secret: Option<String>,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default = "default_mail_timeout")]
    pub mail_timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_mail_from() -> String {
    "no-reply@sharingyatra.app".to_string()
}

fn default_mail_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are converted automatically: mail_relay_url -> MAIL_RELAY_URL
        envy::from_env::<Config>()
    }
}
