use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth credential pair returned by the Spotify accounts service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Raw body of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Opaque Spotify catalog id of a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Read-only view of a playlist as shown in the selection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: u32,
    pub public: bool,
    pub collaborative: bool,
}

/// One page of playlist items. `None` marks a slot that is not a track.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<Option<TrackId>>,
    pub total: u32,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub tracks: u32,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u32,
}

impl From<Playlist> for PlaylistSummary {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            track_count: playlist.tracks.map_or(0, |t| t.total),
            public: playlist.public.unwrap_or(false),
            collaborative: playlist.collaborative,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<PlayableItem>,
}

/// Track or episode object nested in a playlist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayableItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl PlaylistItem {
    /// Returns the track id if this slot holds a catalog track.
    ///
    /// Episodes, removed tracks and local files (which have no id) yield `None`.
    pub fn track_id(&self) -> Option<TrackId> {
        let item = self.track.as_ref()?;
        if item.kind.as_deref() != Some("track") {
            return None;
        }
        item.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(TrackId::new)
    }
}

impl From<PlaylistItemsResponse> for TrackPage {
    fn from(response: PlaylistItemsResponse) -> Self {
        Self {
            items: response.items.iter().map(|i| i.track_id()).collect(),
            total: response.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn non_track_slots_have_no_track_id() {
        let response: PlaylistItemsResponse = serde_json::from_value(json!({
            "items": [
                { "track": { "id": "a", "type": "track", "uri": "spotify:track:a" } },
                { "track": { "id": "e", "type": "episode", "uri": "spotify:episode:e" } },
                { "track": null },
                { "track": { "id": null, "type": "track", "uri": "spotify:local:x" } },
                { }
            ],
            "total": 5
        }))
        .unwrap();

        let page = TrackPage::from(response);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 5);
        assert_eq!(
            page.items,
            vec![Some(TrackId::new("a")), None, None, None, None]
        );
    }

    #[test]
    fn playlist_without_public_flag_is_treated_as_private() {
        let playlist: Playlist = serde_json::from_value(json!({
            "id": "p1",
            "name": "Road Trip",
            "public": null,
            "collaborative": true,
            "tracks": { "total": 12 }
        }))
        .unwrap();

        let summary = PlaylistSummary::from(playlist);
        assert_eq!(summary.track_count, 12);
        assert!(!summary.public);
        assert!(summary.collaborative);
    }

    #[test]
    fn track_uri_uses_spotify_scheme() {
        assert_eq!(
            TrackId::new("4uLU6hMCjMI75M1A2tKUQC").uri(),
            "spotify:track:4uLU6hMCjMI75M1A2tKUQC"
        );
    }
}
