//! Post-acquisition aggregation and derived metrics.
//!
//! Everything here operates on datasets already acquired or loaded from
//! cache: type-coerced rows in, deduplicated and summarized tables out.

mod rolling;
mod timing;

pub use rolling::{rolling_year_counts, top_artists, RollingPoint};
pub use timing::{daily_average_by_hour, TimingTable};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::datasets::chart::ChartArtistRow;
use crate::datasets::history::TrackRow;

/// Textual scrobble timestamp format as served by the API.
pub const SCROBBLE_TIME_FORMAT: &str = "%d %b %Y, %H:%M";

/// One scrobble with its parsed timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrobble {
    pub artist: String,
    pub track: String,
    pub at: NaiveDateTime,
}

/// Parse every row's textual timestamp.
///
/// A row that does not match [`SCROBBLE_TIME_FORMAT`] exactly fails the
/// whole parse; there is no partial-success path for malformed history.
pub fn parse_scrobbles(rows: &[TrackRow]) -> Result<Vec<Scrobble>> {
    rows.iter()
        .map(|row| {
            let at = NaiveDateTime::parse_from_str(&row.scrobbled_at, SCROBBLE_TIME_FORMAT)
                .with_context(|| {
                    format!(
                        "Unparseable scrobble time {:?} for track {:?}",
                        row.scrobbled_at, row.name
                    )
                })?;
            Ok(Scrobble {
                artist: row.artist.clone(),
                track: row.name.clone(),
                at,
            })
        })
        .collect()
}

/// Keep the first row seen for each non-empty MusicBrainz id.
///
/// Rows without an id are all kept; collapsing them would conflate
/// unrelated artists.
pub fn dedup_by_mbid(rows: Vec<ChartArtistRow>) -> Vec<ChartArtistRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| row.mbid.is_empty() || seen.insert(row.mbid.clone()))
        .collect()
}

/// Average plays per listener. Zero listeners yields a non-finite value,
/// not an error.
pub fn plays_per_listener(playcount: f64, listeners: f64) -> f64 {
    playcount / listeners
}

/// The top `n` rows by `metric`, descending. NaN ranks below everything.
pub fn top_n_by<T, F>(rows: &[T], metric: F, n: usize) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    fn rank_key(value: f64) -> f64 {
        if value.is_nan() {
            f64::NEG_INFINITY
        } else {
            value
        }
    }

    let mut sorted: Vec<&T> = rows.iter().collect();
    sorted.sort_by(|a, b| rank_key(metric(b)).total_cmp(&rank_key(metric(a))));
    sorted.truncate(n);
    sorted
}
