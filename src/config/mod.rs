mod file_config;
mod reference;

pub use file_config::FileConfig;
pub use reference::{countries, country_name_corrections, reference_name_map, DEFAULT_USER_AGENT};

use anyhow::{bail, Result};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::names::NameMap;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Credentials and identity
    pub api_key: String,
    pub username: String,
    pub user_agent: String,

    // Storage locations
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,

    // Request pacing (uniform fixed delays, no backoff)
    pub artist_request_interval: Duration,
    pub track_request_interval: Duration,

    // Dataset shape
    pub chart_artist_count: u64,
    pub chart_page_size: u32,
    pub tracks_per_page: u32,
    pub complete_years: RangeInclusive<i32>,

    // Reference tables
    pub countries: Vec<String>,
    pub country_name_corrections: NameMap,
    pub reference_name_map: NameMap,
    pub reference_countries_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_key = match file.api_key {
            Some(key) if !key.is_empty() => key,
            _ => bail!("api_key must be set in the config file"),
        };
        let username = match file.username {
            Some(user) if !user.is_empty() => user,
            _ => bail!("username must be set in the config file"),
        };
        let user_agent = file
            .user_agent
            .unwrap_or_else(|| reference::DEFAULT_USER_AGENT.to_string());

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("data"));
        let results_dir = file
            .results_dir
            .map(PathBuf::from)
            .or_else(|| cli.results_dir.clone())
            .unwrap_or_else(|| PathBuf::from("results"));

        let artist_request_interval =
            Duration::from_millis(file.artist_request_interval_ms.unwrap_or(1000));
        let track_request_interval =
            Duration::from_millis(file.track_request_interval_ms.unwrap_or(2000));

        let chart_artist_count = file.chart_artist_count.unwrap_or(2000);
        let chart_page_size = file.chart_page_size.unwrap_or(50);
        if chart_page_size == 0 {
            bail!("chart_page_size must be greater than zero");
        }
        let tracks_per_page = file.tracks_per_page.unwrap_or(200);
        if tracks_per_page == 0 {
            bail!("tracks_per_page must be greater than zero");
        }

        let first_complete_year = file.first_complete_year.unwrap_or(2015);
        let last_complete_year = file.last_complete_year.unwrap_or(2022);
        if first_complete_year > last_complete_year {
            bail!(
                "first_complete_year {} is after last_complete_year {}",
                first_complete_year,
                last_complete_year
            );
        }

        let countries = file.countries.unwrap_or_else(reference::countries);
        let country_name_corrections = file
            .country_name_corrections
            .unwrap_or_else(reference::country_name_corrections);
        let reference_name_map = file
            .reference_name_map
            .unwrap_or_else(reference::reference_name_map);
        let reference_countries_file = file.reference_countries_file.map(PathBuf::from);

        Ok(Self {
            api_key,
            username,
            user_agent,
            data_dir,
            results_dir,
            artist_request_interval,
            track_request_interval,
            chart_artist_count,
            chart_page_size,
            tracks_per_page,
            complete_years: first_complete_year..=last_complete_year,
            countries,
            country_name_corrections,
            reference_name_map,
            reference_countries_file,
        })
    }

    pub fn country_artists_path(&self) -> PathBuf {
        self.data_dir.join("country_artists.csv")
    }

    pub fn top_artists_path(&self) -> PathBuf {
        self.data_dir.join("top_artists.csv")
    }

    pub fn tracks_path(&self) -> PathBuf {
        self.data_dir.join("tracks.csv")
    }

    pub fn tracks_page_path(&self, page: u32) -> PathBuf {
        self.data_dir
            .join("tracks_pages")
            .join(format!("page_{}.csv", page))
    }
}
