use tabled::Table;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    config::Config,
    errors::FixError,
    info,
    management::{JobOutcome, ReconstructionJob},
    spotify::{self, SpotifyApi, playlist},
    success,
    types::{PlaylistSummary, PlaylistTableRow},
    utils, warning,
};

/// Runs the whole pipeline: login, list playlists, select, rebuild.
///
/// `selection` replaces the interactive prompt when given; it is parsed by the
/// same rules. Every returned error is fatal for the run.
pub async fn fix(config: Config, selection: Option<String>) -> Result<(), FixError> {
    let client = spotify::auth::login(&config).await?;
    fix_playlists(&client, &config, selection).await?;
    Ok(())
}

/// Everything after the login: profile, listing, selection and the rebuilds.
///
/// Returns the outcome of each selected playlist once the run is done. A
/// playlist that fails to rebuild, fully or partially, does not fail the run.
pub async fn fix_playlists<A>(
    api: &A,
    config: &Config,
    selection: Option<String>,
) -> Result<Vec<JobOutcome>, FixError>
where
    A: SpotifyApi + ?Sized,
{
    let user = api.current_user().await?;
    success!("Logged in as: {}", user.name());

    info!("Fetching playlists");
    let playlists = playlist::list_all_playlists(api).await?;

    if playlists.is_empty() {
        warning!("No playlists found.");
        return Ok(Vec::new());
    }

    println!("{}", playlist_table(&playlists));

    let input = match selection {
        Some(selection) => selection,
        None => prompt_selection().await?,
    };
    let indices = utils::parse_selection(&input, playlists.len())?;

    let outcomes = run_selection(api, &user.id, &playlists, &indices, config).await;

    success!("Done!");
    Ok(outcomes)
}

/// Reconstructs the selected playlists one after another.
///
/// Failures stay local to their playlist; the returned outcomes are in
/// selection order.
pub async fn run_selection<A>(
    api: &A,
    owner_id: &str,
    playlists: &[PlaylistSummary],
    indices: &[usize],
    config: &Config,
) -> Vec<JobOutcome>
where
    A: SpotifyApi + ?Sized,
{
    let mut outcomes = Vec::with_capacity(indices.len());

    for &index in indices {
        let Some(source) = playlists.get(index) else {
            warning!("Skipping unknown playlist number {}", index + 1);
            continue;
        };

        let job = ReconstructionJob::new(source, config);
        outcomes.push(job.run(api, owner_id).await);
    }

    outcomes
}

pub fn playlist_table(playlists: &[PlaylistSummary]) -> Table {
    let rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: p.name.clone(),
            tracks: p.track_count,
            public: p.public,
            collaborative: p.collaborative,
        })
        .collect();

    Table::new(rows)
}

async fn prompt_selection() -> Result<String, FixError> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            b"\nEnter the numbers of the playlists you want to fix (comma separated, e.g. 1,3,7): ",
        )
        .await
        .map_err(FixError::ConsoleInput)?;
    stdout.flush().await.map_err(FixError::ConsoleInput)?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(FixError::ConsoleInput)?;

    Ok(line)
}
