//! Top artists by country, and the join hand-off for the downstream
//! world-map consumer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::acquisition::acquire_keyed;
use crate::config::AppConfig;
use crate::dataset_store;
use crate::lastfm::models::coerce_count;
use crate::lastfm::{GeoArtist, LastFmApi};
use crate::names::NameMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryArtistRow {
    pub name: String,
    pub mbid: String,
    pub url: String,
    pub listeners: f64,
    pub country_rank: u32,
    pub country: String,
}

impl CountryArtistRow {
    fn from_api(artist: GeoArtist, country: &str, rank: u32) -> Self {
        Self {
            name: artist.name.unwrap_or_default(),
            mbid: artist.mbid.unwrap_or_default(),
            url: artist.url.unwrap_or_default(),
            listeners: coerce_count(artist.listeners.as_deref()),
            country_rank: rank,
            country: country.to_string(),
        }
    }
}

/// Reference-dataset country row, as exported from the boundary dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceCountryRow {
    pub name: String,
}

/// One country's entry in the map hand-off. An empty artist name marks a
/// reference country with no matching service data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapJoinRow {
    pub reference_name: String,
    pub country: String,
    pub artist: String,
    pub listeners: f64,
}

/// Acquire-or-load the geographic dataset and write its hand-off tables.
pub fn run(config: &AppConfig, api: &dyn LastFmApi) -> Result<()> {
    let rows =
        dataset_store::load_or_acquire(&config.country_artists_path(), || acquire(config, api))?;
    info!("Geographic dataset ready with {} rows", rows.len());

    let top = top_artist_per_country(&rows);
    if let Some(reference_file) = &config.reference_countries_file {
        let reference: Vec<ReferenceCountryRow> = dataset_store::read_rows(reference_file)
            .with_context(|| format!("Failed to read reference countries {:?}", reference_file))?;
        let names: Vec<String> = reference.into_iter().map(|row| row.name).collect();

        let joined = join_reference(&names, &config.reference_name_map, &top);
        let unmatched = joined.iter().filter(|row| row.artist.is_empty()).count();
        if unmatched > 0 {
            warn!("{} reference countries have no service data", unmatched);
        }
        dataset_store::write_rows(&config.results_dir.join("top_artist_map.csv"), &joined)?;
    } else {
        let top_rows: Vec<CountryArtistRow> = top.into_iter().cloned().collect();
        dataset_store::write_rows(
            &config.results_dir.join("top_artist_by_country.csv"),
            &top_rows,
        )?;
    }
    Ok(())
}

/// Fetch the top artists for every configured country, one query per
/// country, in the configured order.
pub fn acquire(config: &AppConfig, api: &dyn LastFmApi) -> Result<Vec<CountryArtistRow>> {
    // The service still expects a few outdated country names.
    let keys: Vec<String> = config
        .countries
        .iter()
        .map(|country| config.country_name_corrections.apply(country).to_string())
        .collect();

    let report = acquire_keyed(
        &keys,
        |country| {
            info!("Fetching top artists for {}", country);
            api.country_top_artists(country)
        },
        CountryArtistRow::from_api,
    )?;
    if !report.skipped.is_empty() {
        warn!("{} countries returned no data", report.skipped.len());
    }

    let mut rows = report.rows;
    rows.sort_by(|a, b| {
        (a.country.as_str(), a.country_rank).cmp(&(b.country.as_str(), b.country_rank))
    });
    Ok(rows)
}

/// The `country_rank == 1` row for each country, in dataset order.
pub fn top_artist_per_country(rows: &[CountryArtistRow]) -> Vec<&CountryArtistRow> {
    rows.iter().filter(|row| row.country_rank == 1).collect()
}

/// Left-join reference countries onto the per-country top artists after
/// remapping reference names into the service vocabulary.
///
/// Names the map does not cover pass through unchanged and simply fail to
/// match, surfacing as rows with no artist.
pub fn join_reference(
    reference_names: &[String],
    map: &NameMap,
    top: &[&CountryArtistRow],
) -> Vec<MapJoinRow> {
    reference_names
        .iter()
        .map(|reference_name| {
            let country = map.apply(reference_name).to_string();
            match top.iter().find(|row| row.country == country) {
                Some(row) => MapJoinRow {
                    reference_name: reference_name.clone(),
                    country,
                    artist: row.name.clone(),
                    listeners: row.listeners,
                },
                None => MapJoinRow {
                    reference_name: reference_name.clone(),
                    country,
                    artist: String::new(),
                    listeners: f64::NAN,
                },
            }
        })
        .collect()
}
