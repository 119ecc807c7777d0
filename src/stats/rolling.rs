//! Trailing-year listen counts for a user's most played artists.

use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

use super::Scrobble;

const WINDOW_DAYS: i64 = 365;

/// One evaluation of the trailing-year listen count for an artist.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingPoint {
    pub artist: String,
    pub at: NaiveDateTime,
    pub listens: u64,
}

/// The `k` most scrobbled artists, ties broken by first appearance.
pub fn top_artists(scrobbles: &[Scrobble], k: usize) -> Vec<String> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for scrobble in scrobbles {
        let count = counts.entry(scrobble.artist.as_str()).or_insert(0);
        if *count == 0 {
            order.push(scrobble.artist.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts.
    order.sort_by_key(|artist| std::cmp::Reverse(counts[artist]));
    order.truncate(k);
    order.into_iter().map(String::from).collect()
}

/// Trailing 365-day listen counts for the given artists, evaluated at each
/// of their scrobble timestamps in ascending order.
///
/// The window is left-open: an event exactly 365 days old falls outside it.
pub fn rolling_year_counts(scrobbles: &[Scrobble], artists: &[String]) -> Vec<RollingPoint> {
    let mut points = Vec::new();
    for artist in artists {
        let mut times: Vec<NaiveDateTime> = scrobbles
            .iter()
            .filter(|scrobble| &scrobble.artist == artist)
            .map(|scrobble| scrobble.at)
            .collect();
        times.sort();

        let mut start = 0;
        for (idx, &at) in times.iter().enumerate() {
            let cutoff = at - Duration::days(WINDOW_DAYS);
            while times[start] <= cutoff {
                start += 1;
            }
            points.push(RollingPoint {
                artist: artist.clone(),
                at,
                listens: (idx - start + 1) as u64,
            });
        }
    }
    points
}
