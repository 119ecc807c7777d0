//! A user's complete listening history with rolling and timing summaries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::acquisition::{acquire_paged, FetchOutcome};
use crate::config::AppConfig;
use crate::dataset_store;
use crate::lastfm::{LastFmApi, RecentTrack};
use crate::stats::{self, RollingPoint, TimingTable};

/// How many of the most listened artists the rolling summary follows.
pub const TOP_ARTIST_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRow {
    pub artist: String,
    pub album: String,
    pub name: String,
    pub mbid: String,
    pub url: String,
    /// Scrobble time as served, e.g. "20 May 2020, 14:31".
    pub scrobbled_at: String,
}

impl TrackRow {
    fn from_api(track: RecentTrack) -> Self {
        Self {
            artist: track
                .artist
                .as_ref()
                .and_then(|tagged| tagged.text.clone())
                .unwrap_or_default(),
            album: track
                .album
                .as_ref()
                .and_then(|tagged| tagged.text.clone())
                .unwrap_or_default(),
            name: track.name.unwrap_or_default(),
            mbid: track.mbid.unwrap_or_default(),
            url: track.url.unwrap_or_default(),
            scrobbled_at: track
                .date
                .as_ref()
                .and_then(|date| date.text.clone())
                .unwrap_or_default(),
        }
    }
}

/// Acquire-or-load the listening history and write its summary tables.
pub fn run(config: &AppConfig, api: &dyn LastFmApi) -> Result<()> {
    let rows = dataset_store::load_or_acquire(&config.tracks_path(), || acquire(config, api))?;
    info!("Listening history ready with {} scrobbles", rows.len());

    let scrobbles = stats::parse_scrobbles(&rows)?;

    let top = stats::top_artists(&scrobbles, TOP_ARTIST_COUNT);
    let rolling = stats::rolling_year_counts(&scrobbles, &top);
    write_rolling(&config.results_dir.join("rolling_listens.csv"), &rolling)?;

    let timing = stats::daily_average_by_hour(&scrobbles, config.complete_years.clone());
    write_timing(&config.results_dir.join("listening_timing.csv"), &timing)?;
    Ok(())
}

/// Discover the history's total scrobble count with a probe request, then
/// fetch every page. Each page is also written out as a checkpoint before
/// folding into the full dataset.
pub fn acquire(config: &AppConfig, api: &dyn LastFmApi) -> Result<Vec<TrackRow>> {
    let total = api.recent_tracks_total(&config.username, config.tracks_per_page)?;
    info!("History probe found {} scrobbles", total);

    let report = acquire_paged(
        total,
        config.tracks_per_page,
        |page| {
            info!("Fetching tracks page {}", page);
            let outcome = api.recent_tracks_page(&config.username, page, config.tracks_per_page)?;
            match outcome {
                FetchOutcome::Fetched(tracks) => {
                    let rows: Vec<TrackRow> = tracks.into_iter().map(TrackRow::from_api).collect();
                    dataset_store::write_rows(&config.tracks_page_path(page), &rows)?;
                    Ok(FetchOutcome::Fetched(rows))
                }
                FetchOutcome::Skipped { reason } => Ok(FetchOutcome::Skipped { reason }),
            }
        },
        |row, _page, _rank| row,
    )?;
    if !report.skipped.is_empty() {
        warn!("{} history pages returned no data", report.skipped.len());
    }
    Ok(report.rows)
}

fn write_rolling(path: &Path, points: &[RollingPoint]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["artist", "at", "listens"])?;
    for point in points {
        writer.write_record(&[
            point.artist.clone(),
            point.at.format("%Y-%m-%d %H:%M").to_string(),
            point.listens.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_timing(path: &Path, table: &TimingTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["year".to_string()];
    header.extend((0..24).map(|hour| format!("h{:02}", hour)));
    writer.write_record(&header)?;

    for (year, rates) in table.years.iter().zip(&table.rates) {
        let mut record = vec![year.to_string()];
        record.extend(rates.iter().map(|rate| format!("{:.6}", rate)));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
