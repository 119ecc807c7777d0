//! CSV-backed dataset persistence.
//!
//! Datasets are cached whole: either the file exists and is returned as-is,
//! or the acquisition callback runs to completion and the result is written
//! before being handed back. Existence of the path is the only cache test;
//! there is no freshness check and no partial refresh. Deleting the file is
//! the manual invalidation action.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read all rows of a headered CSV file into typed records.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write `rows` to `path` as a headered CSV file.
///
/// Creates parent directories if they don't exist.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Return the dataset at `path`, acquiring and persisting it on a miss.
///
/// Only "file not found" counts as a miss. A present-but-malformed file is
/// not validated here and surfaces as a decode error instead. The write
/// happens only after `acquire` completes, so an interrupted run leaves no
/// partial cache file behind.
pub fn load_or_acquire<T, F>(path: &Path, acquire: F) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<Vec<T>>,
{
    if path.exists() {
        info!("Loading cached dataset from {:?}", path);
        return read_rows(path)
            .with_context(|| format!("Failed to read cached dataset {:?}", path));
    }

    let rows = acquire()?;
    write_rows(path, &rows).with_context(|| format!("Failed to persist dataset {:?}", path))?;
    info!("Persisted {} rows to {:?}", rows.len(), path);
    Ok(rows)
}
