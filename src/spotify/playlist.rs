use crate::{
    spotify::{ApiError, SpotifyApi},
    types::{PlaylistSummary, TrackId},
};

/// Page size for listing the user's playlists.
const PLAYLIST_PAGE_LIMIT: u32 = 50;

/// Fetches every track id of a playlist, in playlist order.
///
/// Pages are requested with a fixed `limit` and increasing offsets. A page
/// shorter than `limit` ends the walk, whatever total the page reports, so a
/// playlist whose length is a multiple of `limit` costs one extra, empty,
/// request. Non-track slots (episodes, removed tracks, local files) are
/// skipped. Any page error aborts the whole fetch; partial results are never
/// returned.
pub async fn fetch_all_tracks<A>(
    api: &A,
    playlist_id: &str,
    limit: u32,
) -> Result<Vec<TrackId>, ApiError>
where
    A: SpotifyApi + ?Sized,
{
    let mut tracks = Vec::new();
    let mut offset = 0;

    loop {
        let page = api.playlist_items(playlist_id, limit, offset).await?;
        let fetched = page.items.len();

        tracks.extend(page.items.into_iter().flatten());

        if fetched < limit as usize {
            break;
        }

        offset += limit;
    }

    Ok(tracks)
}

/// Lists all playlists of the current user, following pagination to the end.
pub async fn list_all_playlists<A>(api: &A) -> Result<Vec<PlaylistSummary>, ApiError>
where
    A: SpotifyApi + ?Sized,
{
    let mut playlists = Vec::new();
    let mut offset = 0;

    loop {
        let (page, has_more) = api
            .current_user_playlists(PLAYLIST_PAGE_LIMIT, offset)
            .await?;
        let fetched = page.len() as u32;
        playlists.extend(page);

        if !has_more || fetched == 0 {
            break;
        }

        offset += fetched;
    }

    Ok(playlists)
}
