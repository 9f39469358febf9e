use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    info,
    spotify::{ApiError, SpotifyApi},
    success,
    types::{CreatePlaylistRequest, PlaylistSummary, TrackId},
    utils, warning,
};

/// Result of populating a rebuilt playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub playlist_id: String,
    pub name: String,
    pub attempted: usize,
    /// Tracks whose append call failed, in the order they were attempted.
    pub failed: Vec<TrackId>,
}

impl RebuildOutcome {
    pub fn added(&self) -> usize {
        self.attempted - self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Creates the copy of a playlist and fills it one track at a time.
///
/// Spotify timestamps every addition, so appending tracks individually with a
/// pause in between gives each one a distinct "added at" time. The pause is
/// what makes the copy's "Recently Added" order come out right, not a
/// throughput limit.
pub struct PlaylistRebuilder<'a, A: SpotifyApi + ?Sized> {
    api: &'a A,
    pacing: Duration,
    show_progress: bool,
}

impl<'a, A: SpotifyApi + ?Sized> PlaylistRebuilder<'a, A> {
    pub fn new(api: &'a A, pacing: Duration) -> Self {
        Self {
            api,
            pacing,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Creates `"<name> Fixed"` for `owner_id` and appends `tracks` in the
    /// given order.
    ///
    /// Only a failed playlist creation is returned as an error. Individual
    /// append failures are collected in the outcome and the remaining tracks
    /// are still attempted; failed tracks are not retried.
    pub async fn rebuild(
        &self,
        owner_id: &str,
        source: &PlaylistSummary,
        tracks: &[TrackId],
    ) -> Result<RebuildOutcome, ApiError> {
        let request = CreatePlaylistRequest {
            name: utils::fixed_playlist_name(&source.name),
            description: utils::fixed_playlist_description(&source.name),
            public: source.public,
            collaborative: source.collaborative,
        };

        let created = self.api.create_playlist(owner_id, &request).await?;
        success!("Created new playlist: {}", request.name);

        let total = tracks.len();
        info!(
            "Starting transfer of {} tracks (this will take about {} seconds)...",
            total,
            (self.pacing * total as u32).as_secs()
        );

        let pb = self.progress_bar(total);
        let mut failed = Vec::new();

        for (i, track) in tracks.iter().enumerate() {
            if i > 0 {
                sleep(self.pacing).await;
            }

            if let Err(e) = self.api.add_track(&created.id, track).await {
                pb.suspend(|| warning!("Failed to add track {}: {}", track, e));
                failed.push(track.clone());
            }

            pb.inc(1);
            pb.set_message(format!("Tracks remaining: {}", total - (i + 1)));
        }

        pb.finish_and_clear();

        Ok(RebuildOutcome {
            playlist_id: created.id,
            name: request.name,
            attempted: total,
            failed,
        })
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(format!("Tracks remaining: {}", total));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
