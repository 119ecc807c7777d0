//! The global artist chart with listener and play statistics.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::acquisition::acquire_paged;
use crate::config::AppConfig;
use crate::dataset_store;
use crate::lastfm::models::coerce_count;
use crate::lastfm::{ChartArtist, LastFmApi};
use crate::stats;

/// Number of artists carried into each derived summary table.
const SUMMARY_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtistRow {
    pub name: String,
    pub mbid: String,
    pub url: String,
    pub playcount: f64,
    pub listeners: f64,
    pub rank: u64,
}

impl ChartArtistRow {
    fn from_api(artist: ChartArtist, rank: u64) -> Self {
        Self {
            name: artist.name.unwrap_or_default(),
            mbid: artist.mbid.unwrap_or_default(),
            url: artist.url.unwrap_or_default(),
            playcount: coerce_count(artist.playcount.as_deref()),
            listeners: coerce_count(artist.listeners.as_deref()),
            rank,
        }
    }
}

/// A chart row with its derived listening ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistPlayStats {
    pub name: String,
    pub listeners: f64,
    pub playcount: f64,
    pub plays_per_listener: f64,
}

impl ArtistPlayStats {
    pub fn from_row(row: &ChartArtistRow) -> Self {
        Self {
            name: row.name.clone(),
            listeners: row.listeners,
            playcount: row.playcount,
            plays_per_listener: stats::plays_per_listener(row.playcount, row.listeners),
        }
    }
}

/// Acquire-or-load the chart dataset and write the top-20 summary tables.
pub fn run(config: &AppConfig, api: &dyn LastFmApi) -> Result<()> {
    let rows = dataset_store::load_or_acquire(&config.top_artists_path(), || acquire(config, api))?;
    info!("Chart dataset ready with {} rows", rows.len());

    let play_stats: Vec<ArtistPlayStats> = rows.iter().map(ArtistPlayStats::from_row).collect();

    type Metric = fn(&ArtistPlayStats) -> f64;
    let summaries: [(&str, Metric); 3] = [
        ("top_listeners.csv", |s| s.listeners),
        ("top_playcount.csv", |s| s.playcount),
        ("top_plays_per_listener.csv", |s| s.plays_per_listener),
    ];
    for (file_name, metric) in summaries {
        let top: Vec<ArtistPlayStats> = stats::top_n_by(&play_stats, metric, SUMMARY_SIZE)
            .into_iter()
            .cloned()
            .collect();
        dataset_store::write_rows(&config.results_dir.join(file_name), &top)?;
    }
    Ok(())
}

/// Fetch the chart page by page until the configured artist count is
/// covered, then collapse duplicate MusicBrainz ids.
pub fn acquire(config: &AppConfig, api: &dyn LastFmApi) -> Result<Vec<ChartArtistRow>> {
    let page_size = config.chart_page_size;
    let report = acquire_paged(
        config.chart_artist_count,
        page_size,
        |page| {
            info!("Fetching chart page {}", page);
            api.chart_top_artists(page, page_size)
        },
        |artist, _page, rank| ChartArtistRow::from_api(artist, rank),
    )?;
    if !report.skipped.is_empty() {
        warn!("{} chart pages returned no data", report.skipped.len());
    }

    Ok(stats::dedup_by_mbid(report.rows))
}
