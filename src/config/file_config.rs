use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::names::NameMap;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Credentials and identity
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub user_agent: Option<String>,

    // Core settings (can override CLI)
    pub data_dir: Option<String>,
    pub results_dir: Option<String>,

    // Request pacing
    pub artist_request_interval_ms: Option<u64>,
    pub track_request_interval_ms: Option<u64>,

    // Dataset shape
    pub chart_artist_count: Option<u64>,
    pub chart_page_size: Option<u32>,
    pub tracks_per_page: Option<u32>,
    pub first_complete_year: Option<i32>,
    pub last_complete_year: Option<i32>,

    // Reference tables
    pub countries: Option<Vec<String>>,
    pub country_name_corrections: Option<NameMap>,
    pub reference_name_map: Option<NameMap>,
    pub reference_countries_file: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
