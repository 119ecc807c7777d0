//! Blocking HTTP client for the Last.fm web API.
//!
//! Requests are paced by a fixed minimum interval per request family, per
//! Last.fm rate limit guidelines. A non-success status degrades to a
//! skipped frame; only transport failures surface as errors.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::models::{
    ChartArtist, ChartTopArtistsResponse, GeoArtist, GeoTopArtistsResponse, RecentTrack,
    RecentTracksResponse,
};
use super::LastFmApi;
use crate::acquisition::FetchOutcome;

const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

/// Query parameters for one API call. The mandatory fields are always sent;
/// per-method fields stay `None` unless the method uses them.
#[derive(Debug, Default)]
struct ApiQuery<'a> {
    method: &'a str,
    country: Option<&'a str>,
    user: Option<&'a str>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl<'a> ApiQuery<'a> {
    fn new(method: &'a str) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    fn to_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("method", self.method.to_string()),
            ("api_key", api_key.to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(country) = self.country {
            params.push(("country", country.to_string()));
        }
        if let Some(user) = self.user {
            params.push(("user", user.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

pub struct LastFmClient {
    client: Client,
    api_key: String,
    base_url: String,
    artist_interval: Duration,
    track_interval: Duration,
    last_request: Mutex<Instant>,
}

impl LastFmClient {
    /// Create a new client.
    ///
    /// `artist_interval` paces the artist chart methods and `track_interval`
    /// the listening history method; both are uniform fixed delays with no
    /// backoff and no jitter.
    pub fn new(
        api_key: &str,
        user_agent: &str,
        artist_interval: Duration,
        track_interval: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        let longest = artist_interval.max(track_interval);
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: LASTFM_API_BASE.to_string(),
            artist_interval,
            track_interval,
            last_request: Mutex::new(Instant::now() - longest),
        })
    }

    fn rate_limit(&self, interval: Duration) {
        let mut last = self.last_request.lock().unwrap();
        let elapsed = last.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
        *last = Instant::now();
    }

    fn get(&self, interval: Duration, query: &ApiQuery) -> Result<reqwest::blocking::Response> {
        self.rate_limit(interval);
        let response = self
            .client
            .get(&self.base_url)
            .query(&query.to_params(&self.api_key))
            .send()?;
        Ok(response)
    }
}

impl LastFmApi for LastFmClient {
    fn country_top_artists(&self, country: &str) -> Result<FetchOutcome<GeoArtist>> {
        let mut query = ApiQuery::new("geo.gettopartists");
        query.country = Some(country);

        let response = self.get(self.artist_interval, &query)?;
        if !response.status().is_success() {
            return Ok(FetchOutcome::Skipped {
                reason: format!("status {}", response.status()),
            });
        }

        let body: GeoTopArtistsResponse = response
            .json()
            .context("Failed to parse geo.gettopartists response")?;
        let artists = body.topartists.map(|outer| outer.artist).unwrap_or_default();
        Ok(FetchOutcome::Fetched(artists))
    }

    fn chart_top_artists(&self, page: u32, limit: u32) -> Result<FetchOutcome<ChartArtist>> {
        let mut query = ApiQuery::new("chart.gettopartists");
        query.page = Some(page);
        query.limit = Some(limit);

        let response = self.get(self.artist_interval, &query)?;
        if !response.status().is_success() {
            return Ok(FetchOutcome::Skipped {
                reason: format!("status {}", response.status()),
            });
        }

        let body: ChartTopArtistsResponse = response
            .json()
            .context("Failed to parse chart.gettopartists response")?;
        let artists = body.artists.map(|outer| outer.artist).unwrap_or_default();
        Ok(FetchOutcome::Fetched(artists))
    }

    fn recent_tracks_page(
        &self,
        user: &str,
        page: u32,
        limit: u32,
    ) -> Result<FetchOutcome<RecentTrack>> {
        let mut query = ApiQuery::new("user.getrecenttracks");
        query.user = Some(user);
        query.page = Some(page);
        query.limit = Some(limit);

        let response = self.get(self.track_interval, &query)?;
        if !response.status().is_success() {
            return Ok(FetchOutcome::Skipped {
                reason: format!("status {}", response.status()),
            });
        }

        let body: RecentTracksResponse = response
            .json()
            .context("Failed to parse user.getrecenttracks response")?;
        let tracks: Vec<RecentTrack> = body
            .recenttracks
            .map(|outer| outer.track)
            .unwrap_or_default()
            .into_iter()
            // The in-progress track has no scrobble date yet.
            .filter(|track| !track.is_now_playing())
            .collect();
        Ok(FetchOutcome::Fetched(tracks))
    }

    fn recent_tracks_total(&self, user: &str, limit: u32) -> Result<u64> {
        let mut query = ApiQuery::new("user.getrecenttracks");
        query.user = Some(user);
        query.page = Some(1);
        query.limit = Some(limit);

        let response = self.get(self.track_interval, &query)?;
        if !response.status().is_success() {
            anyhow::bail!("History probe failed with status {}", response.status());
        }

        let body: RecentTracksResponse = response
            .json()
            .context("Failed to parse history probe response")?;
        body.recenttracks
            .and_then(|outer| outer.attr)
            .and_then(|attr| attr.total)
            .and_then(|total| total.parse().ok())
            .context("History probe response carried no total count")
    }
}
