#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use spofix::{
    config::Config,
    spotify::{ApiError, SpotifyApi},
    types::{
        CreatePlaylistRequest, CreatePlaylistResponse, PlaylistSummary, TrackId, TrackPage, User,
    },
};

/// A recorded call against [`FakeSpotify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Items {
        playlist_id: String,
        limit: u32,
        offset: u32,
        returned: usize,
    },
    Create {
        user_id: String,
        name: String,
        description: String,
        public: bool,
        collaborative: bool,
    },
    Add {
        playlist_id: String,
        track: TrackId,
    },
}

/// In-memory Spotify double that records every call in order.
#[derive(Default)]
pub struct FakeSpotify {
    pub playlists: Vec<PlaylistSummary>,
    pub items: HashMap<String, Vec<Option<TrackId>>>,
    pub failing_fetch: HashSet<String>,
    pub failing_tracks: HashSet<TrackId>,
    pub fail_create: bool,
    pub fail_listing: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlist(mut self, summary: PlaylistSummary, items: Vec<Option<TrackId>>) -> Self {
        self.items.insert(summary.id.clone(), items);
        self.playlists.push(summary);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn added_tracks(&self) -> Vec<TrackId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add { track, .. } => Some(track),
                _ => None,
            })
            .collect()
    }

    pub fn item_calls(&self) -> Vec<(u32, usize)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Items {
                    offset, returned, ..
                } => Some((offset, returned)),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<User, ApiError> {
        Ok(User {
            id: "test-user".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<PlaylistSummary>, bool), ApiError> {
        if self.fail_listing {
            return Err(failure("cannot list playlists"));
        }

        let start = (offset as usize).min(self.playlists.len());
        let end = (start + limit as usize).min(self.playlists.len());
        let has_more = end < self.playlists.len();
        Ok((self.playlists[start..end].to_vec(), has_more))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<TrackPage, ApiError> {
        if self.failing_fetch.contains(playlist_id) {
            return Err(failure("cannot list items"));
        }

        let all = self.items.get(playlist_id).cloned().unwrap_or_default();
        let start = (offset as usize).min(all.len());
        let end = (start + limit as usize).min(all.len());
        let items = all[start..end].to_vec();

        self.record(Call::Items {
            playlist_id: playlist_id.to_string(),
            limit,
            offset,
            returned: items.len(),
        });

        Ok(TrackPage {
            items,
            total: all.len() as u32,
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError> {
        self.record(Call::Create {
            user_id: user_id.to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            public: request.public,
            collaborative: request.collaborative,
        });

        if self.fail_create {
            return Err(failure("cannot create playlist"));
        }

        Ok(CreatePlaylistResponse {
            id: format!("new-{}", self.created().len()),
            name: request.name.clone(),
            description: Some(request.description.clone()),
            public: Some(request.public),
            collaborative: request.collaborative,
        })
    }

    async fn add_track(&self, playlist_id: &str, track: &TrackId) -> Result<(), ApiError> {
        self.record(Call::Add {
            playlist_id: playlist_id.to_string(),
            track: track.clone(),
        });

        if self.failing_tracks.contains(track) {
            return Err(failure("cannot add track"));
        }
        Ok(())
    }
}

pub fn summary(id: &str, name: &str, public: bool, collaborative: bool) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        track_count: 0,
        public,
        collaborative,
    }
}

pub fn tracks(ids: &[&str]) -> Vec<Option<TrackId>> {
    ids.iter().map(|id| Some(TrackId::new(*id))).collect()
}

pub fn ids(ids: &[&str]) -> Vec<TrackId> {
    ids.iter().map(|id| TrackId::new(*id)).collect()
}

/// Configuration pointing at `base_url` for every remote endpoint, with no pacing.
pub fn test_config(base_url: &str) -> Config {
    let base_url = base_url.to_string();
    Config::from_lookup(move |key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("test-client".to_string()),
        "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("test-secret".to_string()),
        "SPOTIFY_API_AUTH_URL" => Some(format!("{}/authorize", base_url)),
        "SPOTIFY_API_TOKEN_URL" => Some(format!("{}/api/token", base_url)),
        "SPOTIFY_API_URL" => Some(format!("{}/v1", base_url)),
        _ => None,
    })
    .expect("test config is valid")
    .with_pacing(Duration::ZERO)
}
