use thiserror::Error;

use crate::session::store::DEFAULT_IDLE_TTL_SECS;

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(String),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

/// Application configuration loaded from environment variables.
/// Startup fails if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    pub temperature: f32,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Seconds a session may sit idle before it is expired.
    pub session_ttl_secs: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            groq_api_key: require(&lookup, "GROQ_API_KEY")?,
            groq_api_url: lookup("GROQ_API_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            groq_model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            temperature: parse_or(&lookup, "GROQ_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_IDLE_TTL_SECS)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}
