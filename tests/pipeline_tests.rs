//! End-to-end tests for the acquisition pipelines
//!
//! Each test drives a full dataset run (cache check, acquisition,
//! aggregation, hand-off) against the fake API from `common`.

mod common;

use common::{test_config, FakeLastFm};
use scrobble_stats::dataset_store;
use scrobble_stats::datasets::geographic::CountryArtistRow;
use scrobble_stats::datasets::history::TrackRow;
use scrobble_stats::datasets::{chart, geographic, history};
use tempfile::TempDir;

// =============================================================================
// Geographic dataset
// =============================================================================

#[test]
fn test_geographic_run_persists_ranked_rows() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let api = FakeLastFm::new();

    geographic::run(&config, &api).unwrap();

    let rows: Vec<CountryArtistRow> =
        dataset_store::read_rows(&config.country_artists_path()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].country, "Atlantis");
    assert_eq!(rows[0].country_rank, 1);
    assert_eq!(rows[1].country_rank, 2);
    assert_eq!(rows[0].name, "Atlantis Headliner");

    // One request per configured country.
    assert_eq!(api.call_count(), 3);

    // Hand-off table carries only rank-1 rows.
    let top: Vec<CountryArtistRow> =
        dataset_store::read_rows(&config.results_dir.join("top_artist_by_country.csv")).unwrap();
    assert_eq!(top.len(), 3);
    assert!(top.iter().all(|row| row.country_rank == 1));
}

#[test]
fn test_geographic_failed_country_skipped_without_halting() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let api = FakeLastFm::failing_for(&["Borduria"]);

    geographic::run(&config, &api).unwrap();

    let rows: Vec<CountryArtistRow> =
        dataset_store::read_rows(&config.country_artists_path()).unwrap();
    let countries: Vec<&str> = rows.iter().map(|row| row.country.as_str()).collect();
    assert_eq!(
        countries,
        vec!["Atlantis", "Atlantis", "Cydonia", "Cydonia"]
    );
    // The failing key was still attempted.
    assert_eq!(api.call_count(), 3);
}

#[test]
fn test_second_run_issues_zero_remote_calls() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let api = FakeLastFm::new();

    geographic::run(&config, &api).unwrap();
    let first_calls = api.call_count();
    let first_bytes = std::fs::read(config.country_artists_path()).unwrap();

    geographic::run(&config, &api).unwrap();
    let second_bytes = std::fs::read(config.country_artists_path()).unwrap();

    assert_eq!(api.call_count(), first_calls);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_geographic_reference_join_handoff() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());

    // Reference dataset: one name needing the map, one unmatched.
    let reference_path = dir.path().join("reference_countries.csv");
    std::fs::write(&reference_path, "name\nBordurie\nNowhere\n").unwrap();
    config.reference_countries_file = Some(reference_path);

    let api = FakeLastFm::new();
    geographic::run(&config, &api).unwrap();

    let joined: Vec<geographic::MapJoinRow> =
        dataset_store::read_rows(&config.results_dir.join("top_artist_map.csv")).unwrap();
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].country, "Borduria");
    assert_eq!(joined[0].artist, "Borduria Headliner");
    assert_eq!(joined[1].country, "Nowhere");
    assert_eq!(joined[1].artist, "");
}

// =============================================================================
// Chart dataset
// =============================================================================

#[test]
fn test_chart_run_covers_configured_depth() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let api = FakeLastFm::new();

    chart::run(&config, &api).unwrap();

    // ceil(4 / 2) = 2 pages.
    assert_eq!(api.call_count(), 2);

    let rows: Vec<chart::ChartArtistRow> =
        dataset_store::read_rows(&config.top_artists_path()).unwrap();
    assert_eq!(rows.len(), 4);
    let ranks: Vec<u64> = rows.iter().map(|row| row.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);

    for file_name in [
        "top_listeners.csv",
        "top_playcount.csv",
        "top_plays_per_listener.csv",
    ] {
        assert!(config.results_dir.join(file_name).exists());
    }

    // Summaries sort descending on their metric.
    let top: Vec<chart::ArtistPlayStats> =
        dataset_store::read_rows(&config.results_dir.join("top_listeners.csv")).unwrap();
    assert_eq!(top[0].name, "Chart Artist 4");
}

// =============================================================================
// Listening history dataset
// =============================================================================

#[test]
fn test_history_run_writes_checkpoints_and_summaries() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let api = FakeLastFm::new();

    history::run(&config, &api).unwrap();

    // Probe plus ceil(4 / 2) = 2 page requests.
    assert_eq!(api.call_count(), 3);

    let rows: Vec<TrackRow> = dataset_store::read_rows(&config.tracks_path()).unwrap();
    assert_eq!(rows.len(), 4);

    // Per-page checkpoints.
    assert!(config.tracks_page_path(1).exists());
    assert!(config.tracks_page_path(2).exists());

    // Summary hand-offs.
    let rolling = std::fs::read_to_string(config.results_dir.join("rolling_listens.csv")).unwrap();
    assert!(rolling.lines().next().unwrap().starts_with("artist,at,listens"));
    assert_eq!(rolling.lines().count(), 5);

    let timing = std::fs::read_to_string(config.results_dir.join("listening_timing.csv")).unwrap();
    let mut lines = timing.lines();
    assert!(lines.next().unwrap().starts_with("year,h00,h01"));
    assert!(lines.next().unwrap().starts_with("2020,"));
    assert!(lines.next().unwrap().starts_with("2021,"));
}

#[test]
fn test_history_cached_run_skips_probe_and_pages() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let api = FakeLastFm::new();
    history::run(&config, &api).unwrap();
    let first_calls = api.call_count();

    history::run(&config, &api).unwrap();
    assert_eq!(api.call_count(), first_calls);
}

#[test]
fn test_history_malformed_cached_timestamp_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let rows = vec![TrackRow {
        artist: "Nina".to_string(),
        album: "Loops".to_string(),
        name: "Done".to_string(),
        mbid: String::new(),
        url: String::new(),
        scrobbled_at: "2020-05-20T14:31:00Z".to_string(),
    }];
    dataset_store::write_rows(&config.tracks_path(), &rows).unwrap();

    let api = FakeLastFm::new();
    let result = history::run(&config, &api);
    assert!(result.is_err());
    // The cache hit means no remote traffic before the fatal parse.
    assert_eq!(api.call_count(), 0);
}
