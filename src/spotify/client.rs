use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Config,
    management::TokenManager,
    spotify::{ApiError, SpotifyApi},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, GetUserPlaylistsResponse, PlaylistItemsResponse, PlaylistSummary,
        Token, TrackId, TrackPage, User,
    },
};

/// Longest `Retry-After` we are willing to sit out.
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;

/// Authenticated Spotify Web API client.
///
/// Owned by the orchestrator once the login completes. Requests are issued one
/// at a time; the token manager is behind a mutex only because the
/// [`SpotifyApi`] methods take `&self`.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: &Config, token: Token) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.clone(),
            tokens: Mutex::new(TokenManager::new(token, config.clone())),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends a request built by `build`, retrying on rate limits and bad gateways.
    ///
    /// `build` is called again for every attempt so that each one carries the
    /// current access token.
    async fn send<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            let token = self.tokens.lock().await.get_valid_token().await?;
            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if attempt < MAX_RETRIES {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        return Err(ApiError::Status {
                            status: status.as_u16(),
                            message: format!(
                                "retry after has reached an abnormal high of {} seconds",
                                retry_after
                            ),
                        });
                    }
                    attempt += 1;
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                } else if status == StatusCode::BAD_GATEWAY {
                    attempt += 1;
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue;
                }
            }

            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.url("/me");
        let response = self.send(|http| http.get(&url)).await?;
        Ok(response.json::<User>().await?)
    }

    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<PlaylistSummary>, bool), ApiError> {
        let url = self.url("/me/playlists");
        let query = [("limit", limit), ("offset", offset)];
        let response = self.send(|http| http.get(&url).query(&query)).await?;
        let page = response.json::<GetUserPlaylistsResponse>().await?;
        let has_more = page.next.is_some();

        Ok((
            page.items.into_iter().map(PlaylistSummary::from).collect(),
            has_more,
        ))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<TrackPage, ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let query = [("limit", limit), ("offset", offset)];
        let response = self.send(|http| http.get(&url).query(&query)).await?;
        let page = response.json::<PlaylistItemsResponse>().await?;
        Ok(TrackPage::from(page))
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError> {
        let url = self.url(&format!("/users/{}/playlists", user_id));
        let response = self.send(|http| http.post(&url).json(request)).await?;
        Ok(response.json::<CreatePlaylistResponse>().await?)
    }

    async fn add_track(&self, playlist_id: &str, track: &TrackId) -> Result<(), ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: vec![track.uri()],
        };
        let response = self.send(|http| http.post(&url).json(&body)).await?;
        response.json::<AddTrackToPlaylistResponse>().await?;
        Ok(())
    }
}
