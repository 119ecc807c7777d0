//! Last.fm web API access.
//!
//! [`LastFmClient`] is the blocking, rate-limited HTTP implementation;
//! [`LastFmApi`] is the seam that lets the pipeline run against fakes in
//! tests.

mod client;
pub mod models;

pub use client::LastFmClient;
pub use models::{ChartArtist, GeoArtist, RecentTrack};

use crate::acquisition::FetchOutcome;
use anyhow::Result;

/// Boundary to the remote catalog service, one method per remote operation.
///
/// Every method issues exactly one bounded query. A non-success response
/// becomes `FetchOutcome::Skipped`; transport failures are `Err`.
pub trait LastFmApi {
    /// The most-listened artists for one country (`geo.gettopartists`).
    fn country_top_artists(&self, country: &str) -> Result<FetchOutcome<GeoArtist>>;

    /// One page of the global artist chart (`chart.gettopartists`).
    fn chart_top_artists(&self, page: u32, limit: u32) -> Result<FetchOutcome<ChartArtist>>;

    /// One page of a user's listening history (`user.getrecenttracks`),
    /// excluding the in-progress track.
    fn recent_tracks_page(
        &self,
        user: &str,
        page: u32,
        limit: u32,
    ) -> Result<FetchOutcome<RecentTrack>>;

    /// Probe request discovering the total scrobble count of a user's
    /// history. Failure here is fatal; without it the page count is
    /// unknowable.
    fn recent_tracks_total(&self, user: &str, limit: u32) -> Result<u64>;
}
