//! Configuration management for the Spotify Playlist Fixer.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files. Values are collected once into an explicit [`Config`] that
//! is handed to the components that need it, so nothing reads the process
//! environment after startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then in the working directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::errors::FixError;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_PACING_MS: u64 = 1000;
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Loads environment variables from `.env` files.
///
/// Creates the `spofix` directory in the platform-specific local data directory
/// if it doesn't exist and loads `spofix/.env` from there. A `.env` file in the
/// current working directory is loaded afterwards. Variables that are already
/// set in the environment are never overwritten, and neither file is required.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spofix/.env`
/// - macOS: `~/Library/Application Support/spofix/.env`
/// - Windows: `%LOCALAPPDATA%/spofix/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spofix/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Runtime configuration for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_address: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Delay between two consecutive "add track" calls.
    pub pacing: Duration,
    /// Page size used when listing playlist items.
    pub page_limit: u32,
    /// Upper bound for the login wait. `None` waits forever.
    pub login_timeout: Option<Duration>,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, FixError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FixError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| missing(key));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.into());

        let pacing_ms = parse_number::<u64>("SPOFIX_PACING_MS", get("SPOFIX_PACING_MS"))?
            .unwrap_or(DEFAULT_PACING_MS);

        let page_limit = parse_number::<u32>("SPOFIX_PAGE_LIMIT", get("SPOFIX_PAGE_LIMIT"))?
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=50).contains(&page_limit) {
            return Err(FixError::Config(format!(
                "SPOFIX_PAGE_LIMIT must be between 1 and 50, got {}",
                page_limit
            )));
        }

        let login_timeout = parse_number::<u64>(
            "SPOFIX_LOGIN_TIMEOUT_SECS",
            get("SPOFIX_LOGIN_TIMEOUT_SECS"),
        )?
        .map(Duration::from_secs);

        Ok(Self {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            pacing: Duration::from_millis(pacing_ms),
            page_limit,
            login_timeout,
        })
    }

    /// Returns a copy with a different pacing delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

fn missing(key: &str) -> FixError {
    FixError::Config(format!("{} must be set", key))
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
) -> Result<Option<T>, FixError> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| FixError::Config(format!("{} must be a number, got '{}'", key, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.pacing, Duration::from_secs(1));
        assert_eq!(config.page_limit, 50);
        assert!(config.login_timeout.is_none());
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("SPOTIFY_API_AUTH_CLIENT_ID", "id")])).unwrap_err();
        assert!(
            matches!(err, FixError::Config(msg) if msg.contains("SPOTIFY_API_AUTH_CLIENT_SECRET"))
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "  "),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, FixError::Config(_)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
            ("SPOTIFY_API_URL", "http://localhost:9999/v1/"),
            ("SPOFIX_PACING_MS", "0"),
            ("SPOFIX_PAGE_LIMIT", "20"),
            ("SPOFIX_LOGIN_TIMEOUT_SECS", "300"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9999/v1");
        assert_eq!(config.pacing, Duration::ZERO);
        assert_eq!(config.page_limit, 20);
        assert_eq!(config.login_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let base = [
            ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("SPOFIX_PACING_MS", "soon"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = base.to_vec();
        pairs.push(("SPOFIX_PAGE_LIMIT", "100"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
