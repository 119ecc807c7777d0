//! Common test infrastructure
//!
//! A fake Last.fm API with canned responses and call counting, plus a
//! config factory pointed at a temporary directory. Tests drive the real
//! pipelines against these, with no network involved.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use scrobble_stats::acquisition::FetchOutcome;
use scrobble_stats::config::AppConfig;
use scrobble_stats::lastfm::models::{ScrobbleDate, TaggedName};
use scrobble_stats::lastfm::{ChartArtist, GeoArtist, LastFmApi, RecentTrack};
use scrobble_stats::names::NameMap;

/// Fake remote service with two artists per country, a fixed chart, and a
/// two-page listening history. Every remote call bumps `calls`.
#[derive(Default)]
pub struct FakeLastFm {
    pub calls: AtomicUsize,
    /// Countries answered with a non-success status.
    pub failing_countries: Vec<String>,
}

impl FakeLastFm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(countries: &[&str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing_countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl LastFmApi for FakeLastFm {
    fn country_top_artists(&self, country: &str) -> Result<FetchOutcome<GeoArtist>> {
        self.bump();
        if self.failing_countries.iter().any(|c| c == country) {
            return Ok(FetchOutcome::Skipped {
                reason: "status 500 Internal Server Error".to_string(),
            });
        }
        Ok(FetchOutcome::Fetched(vec![
            GeoArtist {
                name: Some(format!("{} Headliner", country)),
                listeners: Some("1000".to_string()),
                mbid: Some(format!("mbid-{}-1", country)),
                url: None,
            },
            GeoArtist {
                name: Some(format!("{} Runner-up", country)),
                listeners: Some("500".to_string()),
                mbid: Some(format!("mbid-{}-2", country)),
                url: None,
            },
        ]))
    }

    fn chart_top_artists(&self, page: u32, limit: u32) -> Result<FetchOutcome<ChartArtist>> {
        self.bump();
        let artists = (0..limit)
            .map(|idx| {
                let global = (page - 1) * limit + idx + 1;
                ChartArtist {
                    name: Some(format!("Chart Artist {}", global)),
                    playcount: Some((global * 900).to_string()),
                    listeners: Some((global * 100).to_string()),
                    mbid: Some(format!("chart-mbid-{}", global)),
                    url: None,
                }
            })
            .collect();
        Ok(FetchOutcome::Fetched(artists))
    }

    fn recent_tracks_page(
        &self,
        _user: &str,
        page: u32,
        limit: u32,
    ) -> Result<FetchOutcome<RecentTrack>> {
        self.bump();
        let dates = [
            "20 May 2020, 14:31",
            "21 May 2020, 09:05",
            "01 Jun 2021, 23:59",
            "02 Jun 2021, 08:15",
        ];
        let tracks = (0..limit)
            .map(|idx| {
                let global = ((page - 1) * limit + idx) as usize;
                RecentTrack {
                    name: Some(format!("Track {}", global + 1)),
                    mbid: None,
                    url: None,
                    artist: Some(TaggedName {
                        text: Some("Nina".to_string()),
                        mbid: None,
                    }),
                    album: Some(TaggedName {
                        text: Some("Loops".to_string()),
                        mbid: None,
                    }),
                    date: Some(ScrobbleDate {
                        text: Some(dates[global % dates.len()].to_string()),
                        uts: None,
                    }),
                    attr: None,
                }
            })
            .collect();
        Ok(FetchOutcome::Fetched(tracks))
    }

    fn recent_tracks_total(&self, _user: &str, _limit: u32) -> Result<u64> {
        self.bump();
        Ok(4)
    }
}

/// Pipeline config rooted in a temporary directory, sized down so a full
/// run stays small: three countries, a four-artist chart, four scrobbles.
pub fn test_config(root: &Path) -> AppConfig {
    AppConfig {
        api_key: "test-key".to_string(),
        username: "someone".to_string(),
        user_agent: "scrobble-stats-tests".to_string(),
        data_dir: root.join("data"),
        results_dir: root.join("results"),
        artist_request_interval: Duration::ZERO,
        track_request_interval: Duration::ZERO,
        chart_artist_count: 4,
        chart_page_size: 2,
        tracks_per_page: 2,
        complete_years: 2020..=2021,
        countries: vec![
            "Atlantis".to_string(),
            "Borduria".to_string(),
            "Cydonia".to_string(),
        ],
        country_name_corrections: NameMap::default(),
        reference_name_map: NameMap::from_pairs(&[("Bordurie", "Borduria")]),
        reference_countries_file: None,
    }
}
