use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::oneshot;

use crate::{
    config::Config,
    errors::FixError,
    info,
    server::CallbackServer,
    spotify::{ApiError, client::SpotifyClient},
    success,
    types::{Token, TokenResponse},
    utils,
};

/// Scopes requested during login: read private playlists, modify public and
/// private playlists, read the user profile.
pub const SCOPES: [&str; 4] = [
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-read-private",
];

/// What the callback listener hands back to the waiting orchestrator.
pub type LoginResult = Result<Token, FixError>;

/// Runs the authorization-code login and returns an authenticated client.
///
/// # Authentication Flow
///
/// 1. **State**: Generates a single-use CSRF token
/// 2. **Server Start**: Binds the local callback listener and serves it in the background
/// 3. **Login URL**: Prints the Spotify authorization URL for the user to open manually
/// 4. **Callback Handling**: The listener validates `state` and exchanges the code
/// 5. **Hand-off**: The token arrives through a one-shot channel
/// 6. **Shutdown**: The listener is drained and stopped, whatever the outcome
///
/// Every error returned here is fatal for the run.
pub async fn login(config: &Config) -> Result<SpotifyClient, FixError> {
    let state = utils::generate_state(utils::STATE_BYTES)?;
    let server = CallbackServer::bind(&config.server_address).await?;
    let auth_url = authorize_url(config, &state)?;

    let (receiver, handle) = server.spawn(state, config.clone());

    info!(
        "Please log in to Spotify by visiting the following page in your browser:\n{}",
        auth_url
    );

    let login = wait_for_login(receiver, config.login_timeout).await;
    // Let the browser receive its response before a failed login ends the process.
    handle.shutdown().await;
    let token = login?;
    success!("Authentication successful!");

    Ok(SpotifyClient::new(config, token))
}

/// Builds the Spotify login URL the user has to open in a browser.
///
/// The URL requests an authorization code for [`SCOPES`] and carries `state`
/// so the redirect can be matched to this run.
pub fn authorize_url(config: &Config, state: &str) -> Result<String, FixError> {
    let scope = SCOPES.join(" ");
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| FixError::Config(format!("invalid authorization url: {}", e)))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for an access/refresh token pair.
pub async fn exchange_code(config: &Config, code: &str) -> Result<Token, ApiError> {
    let response = request_token(
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token: response.refresh_token.unwrap_or_default(),
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Obtains a fresh access token using the refresh-token grant.
///
/// Spotify may omit the refresh token in the response, in which case the
/// previous one stays valid and is carried over.
pub async fn refresh_token(config: &Config, current: &Token) -> Result<Token, ApiError> {
    let response = request_token(
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", current.refresh_token.as_str()),
        ],
    )
    .await
    .map_err(|e| ApiError::Token(e.to_string()))?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .unwrap_or_else(|| current.refresh_token.clone()),
        scope: response.scope.unwrap_or_else(|| current.scope.clone()),
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}

async fn request_token(config: &Config, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
    let client = Client::new();
    let response = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Blocks until the callback listener delivers a login result.
///
/// With `timeout` set to `None` the wait is unbounded, matching a user who
/// takes as long as they like in the browser.
pub async fn wait_for_login(
    receiver: oneshot::Receiver<LoginResult>,
    timeout: Option<std::time::Duration>,
) -> Result<Token, FixError> {
    let received = match timeout {
        Some(limit) => tokio::time::timeout(limit, receiver)
            .await
            .map_err(|_| FixError::LoginTimedOut(limit))?,
        None => receiver.await,
    };

    received.map_err(|_| FixError::CallbackDropped)?
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::*;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SPOTIFY_API_AUTH_CLIENT_ID" => Some("client-123".to_string()),
            "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn authorize_url_carries_state_and_all_scopes() {
        let url = authorize_url(&config(), "abc_DEF-123").unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("accounts.spotify.com"));
        let pairs: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        let get = |key: &str| pairs.get(key).map(String::as_str);

        assert_eq!(get("client_id"), Some("client-123"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("state"), Some("abc_DEF-123"));
        assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8080/callback"));
        let scopes = &pairs["scope"];
        assert_eq!(scopes.split(' ').count(), 4);
        for scope in SCOPES {
            assert!(scopes.contains(scope));
        }
    }

    #[tokio::test]
    async fn wait_for_login_returns_delivered_token() {
        let (tx, rx) = oneshot::channel();
        tx.send(Ok(Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: String::new(),
            expires_in: 3600,
            obtained_at: 0,
        }))
        .unwrap();

        let token = wait_for_login(rx, None).await.unwrap();
        assert_eq!(token.access_token, "access");
    }

    #[tokio::test]
    async fn wait_for_login_reports_dropped_listener() {
        let (tx, rx) = oneshot::channel::<LoginResult>();
        drop(tx);

        let err = wait_for_login(rx, None).await.unwrap_err();
        assert!(matches!(err, FixError::CallbackDropped));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_login_times_out_when_bounded() {
        let (_tx, rx) = oneshot::channel::<LoginResult>();

        let err = wait_for_login(rx, Some(Duration::from_secs(30)))
            .await
            .unwrap_err();
        assert!(matches!(err, FixError::LoginTimedOut(d) if d == Duration::from_secs(30)));
    }
}
