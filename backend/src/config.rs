//! Process configuration.
//!
//! Everything the service needs from the environment is read once at startup
//! into [`AppConfig`] and passed to the clients explicitly; nothing reads
//! environment variables after boot.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

/// SMTP relay settings for the code delivery client.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Base URL of the sheet-backed lookup API.
    pub lookup_api_url: String,
    /// Base URL of the sheet-backed review/enrollment sink.
    pub submission_api_url: String,
    /// Origin allowed by CORS (the web frontend).
    pub allowed_origin: String,
    /// Upper bound on a single code delivery call, in seconds.
    pub delivery_timeout_secs: u64,
    pub smtp: SmtpConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parse_or_default("PORT", 3000)?,
            lookup_api_url: required("LOOKUP_API_URL")?,
            submission_api_url: required("SUBMISSION_API_URL")?,
            allowed_origin: or_default("ALLOWED_ORIGIN", "http://localhost:8080"),
            delivery_timeout_secs: parse_or_default("DELIVERY_TIMEOUT_SECS", 15)?,
            smtp: SmtpConfig {
                server: required("SMTP_SERVER")?,
                port: parse_or_default("SMTP_PORT", 587)?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from_email: required("SMTP_FROM")?,
            },
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("required environment variable {key} is not set"))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
