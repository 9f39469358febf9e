//! # Spotify Integration Module
//!
//! This module is the integration layer between spofix and the Spotify Web API.
//! It covers the OAuth authorization-code handshake, the authenticated HTTP
//! client, and the playlist operations the reconstruction pipeline relies on.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (fix command)
//!          ↓
//! Management Layer (ReconstructionJob, PlaylistRebuilder, TokenManager)
//!          ↓
//! SpotifyApi trait
//!     ├── SpotifyClient (reqwest, bearer token, retry on 429/502)
//!     └── test doubles
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization URL, code exchange, token refresh and the login wait
//! - [`client`] - [`client::SpotifyClient`], the authenticated implementation of [`SpotifyApi`]
//! - [`playlist`] - Paginated retrieval of playlists and playlist tracks
//!
//! ## Rate Limiting
//!
//! Retrying on `429 Too Many Requests` happens inside [`client::SpotifyClient`],
//! beneath the trait. Callers of [`SpotifyApi`] see either a result or a final
//! [`ApiError`].

pub mod auth;
pub mod client;
pub mod playlist;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{
    CreatePlaylistRequest, CreatePlaylistResponse, PlaylistSummary, TrackId, TrackPage, User,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spotify responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("cannot refresh access token: {0}")]
    Token(String),
}

/// The Spotify operations the reconstruction pipeline depends on.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user(&self) -> Result<User, ApiError>;

    /// One page of the current user's playlists.
    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<PlaylistSummary>, bool), ApiError>;

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<TrackPage, ApiError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError>;

    async fn add_track(&self, playlist_id: &str, track: &TrackId) -> Result<(), ApiError>;
}
