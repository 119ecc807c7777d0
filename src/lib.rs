//! Scrobble Stats Library
//!
//! This library exposes the acquisition pipeline modules for testing and
//! potential reuse.

pub mod acquisition;
pub mod config;
pub mod dataset_store;
pub mod datasets;
pub mod lastfm;
pub mod names;
pub mod stats;

// Re-export commonly used types for convenience
pub use acquisition::{AcquisitionReport, FetchOutcome, SkippedQuery};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use lastfm::{LastFmApi, LastFmClient};
pub use names::NameMap;
