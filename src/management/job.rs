use std::time::Duration;

use crate::{
    config::Config,
    info,
    management::{PlaylistRebuilder, RebuildOutcome},
    spotify::{ApiError, SpotifyApi, playlist},
    success,
    types::PlaylistSummary,
    utils, warning,
};

/// How the reconstruction of one playlist ended.
#[derive(Debug)]
pub enum JobOutcome {
    /// Listing the source tracks failed; nothing was created.
    FetchFailed(ApiError),
    /// The source has no tracks; nothing was created.
    NoTracks,
    /// The copy could not be created; no tracks were sent.
    CreateFailed(ApiError),
    Rebuilt(RebuildOutcome),
}

/// Rebuilds one selected playlist: fetch, reverse, create, populate.
///
/// A job lives for exactly one playlist and keeps nothing afterwards. Every
/// failure is reported and turned into a [`JobOutcome`] so the caller can
/// move on to the next selection.
pub struct ReconstructionJob<'a> {
    source: &'a PlaylistSummary,
    page_limit: u32,
    pacing: Duration,
    show_progress: bool,
}

impl<'a> ReconstructionJob<'a> {
    pub fn new(source: &'a PlaylistSummary, config: &Config) -> Self {
        Self {
            source,
            page_limit: config.page_limit,
            pacing: config.pacing,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run<A>(&self, api: &A, owner_id: &str) -> JobOutcome
    where
        A: SpotifyApi + ?Sized,
    {
        info!("Processing playlist: {}", self.source.name);

        let fetched = playlist::fetch_all_tracks(api, &self.source.id, self.page_limit).await;
        let tracks = match fetched {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Error fetching tracks for {}: {}", self.source.name, e);
                return JobOutcome::FetchFailed(e);
            }
        };

        if tracks.is_empty() {
            info!("No tracks found.");
            return JobOutcome::NoTracks;
        }

        let reversed = utils::reversed(&tracks);

        let rebuilder = PlaylistRebuilder::new(api, self.pacing).with_progress(self.show_progress);
        match rebuilder.rebuild(owner_id, self.source, &reversed).await {
            Ok(outcome) => {
                if outcome.is_complete() {
                    success!(
                        "Playlist processing complete: {} tracks added to {}.",
                        outcome.added(),
                        outcome.name
                    );
                } else {
                    warning!(
                        "Playlist processing complete: {} of {} tracks added to {}, failed: {}",
                        outcome.added(),
                        outcome.attempted,
                        outcome.name,
                        outcome
                            .failed
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
                JobOutcome::Rebuilt(outcome)
            }
            Err(e) => {
                warning!(
                    "Error creating playlist {}: {}",
                    utils::fixed_playlist_name(&self.source.name),
                    e
                );
                JobOutcome::CreateFailed(e)
            }
        }
    }
}
