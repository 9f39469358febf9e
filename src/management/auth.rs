use chrono::Utc;

use crate::{
    config::Config,
    spotify::{ApiError, auth},
    types::Token,
};

/// Seconds before expiry at which a token is already considered stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Keeps the access token of a run valid for as long as the run lasts.
pub struct TokenManager {
    token: Token,
    config: Config,
}

impl TokenManager {
    pub fn new(token: Token, config: Config) -> Self {
        TokenManager { token, config }
    }

    /// Returns an access token, refreshing it first if it is about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, ApiError> {
        if self.is_expired() {
            self.token = auth::refresh_token(&self.config, &self.token).await?;
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens here, so any refresh attempt fails.
    const UNREACHABLE_TOKEN_URL: &str = "http://127.0.0.1:1/token";

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SPOTIFY_API_AUTH_CLIENT_ID" => Some("id".to_string()),
            "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("secret".to_string()),
            "SPOTIFY_API_TOKEN_URL" => Some(UNREACHABLE_TOKEN_URL.to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn token(obtained_at: u64, expires_in: u64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: String::new(),
            expires_in,
            obtained_at,
        }
    }

    #[tokio::test]
    async fn fresh_token_is_returned_without_refresh() {
        let now = Utc::now().timestamp() as u64;
        let mut manager = TokenManager::new(token(now, 3600), config());

        assert_eq!(manager.get_valid_token().await.unwrap(), "access");
    }

    #[test]
    fn token_inside_the_margin_is_expired() {
        let now = Utc::now().timestamp() as u64;
        let manager = TokenManager::new(token(now - 3500, 3600), config());
        assert!(manager.is_expired());

        let manager = TokenManager::new(token(now, 3600), config());
        assert!(!manager.is_expired());
    }
}
