use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Remote credentials are optional at startup. A missing `GEMINI_API_KEY` is reported
/// per request as a configuration error so the rest of the API stays usable.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_client_id: Option<String>,
    pub preferences_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            google_client_id: optional_env("GOOGLE_CLIENT_ID"),
            preferences_path: std::env::var("PREFERENCES_PATH")
                .unwrap_or_else(|_| ".call-insight/preferences.json".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
