//! Serde models for the Last.fm API responses consumed by the pipeline.
//!
//! Counts arrive as decimal strings. Coercion to floating point happens when
//! frames are decorated into dataset rows, with non-numeric or absent values
//! becoming NaN rather than errors.

use serde::Deserialize;

/// `geo.gettopartists` response envelope.
#[derive(Debug, Deserialize)]
pub struct GeoTopArtistsResponse {
    pub topartists: Option<GeoTopArtists>,
}

#[derive(Debug, Deserialize)]
pub struct GeoTopArtists {
    #[serde(default)]
    pub artist: Vec<GeoArtist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoArtist {
    pub name: Option<String>,
    pub listeners: Option<String>,
    pub mbid: Option<String>,
    pub url: Option<String>,
}

/// `chart.gettopartists` response envelope.
#[derive(Debug, Deserialize)]
pub struct ChartTopArtistsResponse {
    pub artists: Option<ChartArtists>,
}

#[derive(Debug, Deserialize)]
pub struct ChartArtists {
    #[serde(default)]
    pub artist: Vec<ChartArtist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartArtist {
    pub name: Option<String>,
    pub playcount: Option<String>,
    pub listeners: Option<String>,
    pub mbid: Option<String>,
    pub url: Option<String>,
}

/// `user.getrecenttracks` response envelope.
#[derive(Debug, Deserialize)]
pub struct RecentTracksResponse {
    pub recenttracks: Option<RecentTracks>,
}

#[derive(Debug, Deserialize)]
pub struct RecentTracks {
    #[serde(default)]
    pub track: Vec<RecentTrack>,
    #[serde(rename = "@attr")]
    pub attr: Option<RecentTracksAttr>,
}

/// Pagination metadata carried on the `recenttracks` envelope.
#[derive(Debug, Deserialize)]
pub struct RecentTracksAttr {
    pub total: Option<String>,
    #[serde(rename = "totalPages")]
    pub total_pages: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentTrack {
    pub name: Option<String>,
    pub mbid: Option<String>,
    pub url: Option<String>,
    pub artist: Option<TaggedName>,
    pub album: Option<TaggedName>,
    pub date: Option<ScrobbleDate>,
    #[serde(rename = "@attr")]
    pub attr: Option<RecentTrackAttr>,
}

impl RecentTrack {
    /// True for the currently playing track, which carries no scrobble date.
    pub fn is_now_playing(&self) -> bool {
        self.attr
            .as_ref()
            .and_then(|attr| attr.nowplaying.as_deref())
            == Some("true")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTrackAttr {
    pub nowplaying: Option<String>,
}

/// The service's `{"#text": ..., "mbid": ...}` nested name shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaggedName {
    #[serde(rename = "#text")]
    pub text: Option<String>,
    pub mbid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrobbleDate {
    #[serde(rename = "#text")]
    pub text: Option<String>,
    pub uts: Option<String>,
}

/// Coerce a service-side decimal string to f64, NaN when absent or
/// malformed.
pub fn coerce_count(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
