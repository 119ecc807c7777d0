//! Sequential acquisition drivers for paginated remote datasets.
//!
//! Two termination modes are supported: a known finite key set, and a page
//! count discovered from a probe request. Accumulation is a pure fold over
//! per-key frames so the concatenation step can be tested without any
//! network involvement.

use anyhow::Result;
use tracing::warn;

/// Outcome of a single remote query.
///
/// A non-success response degrades to `Skipped` so that one bad key cannot
/// abort a whole run. Transport failures still surface as `Err` from the
/// fetch callback and do abort.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Skipped { reason: String },
}

/// A query key that produced no rows, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuery {
    pub key: String,
    pub reason: String,
}

/// Rows accumulated across a full acquisition run, plus the keys skipped
/// along the way.
#[derive(Debug)]
pub struct AcquisitionReport<R> {
    pub rows: Vec<R>,
    pub skipped: Vec<SkippedQuery>,
}

impl<R> AcquisitionReport<R> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Append `next` onto `acc`, preserving both orders.
pub fn fold_rows<R>(mut acc: Vec<R>, mut next: Vec<R>) -> Vec<R> {
    acc.append(&mut next);
    acc
}

/// Number of page requests needed to cover `total_units`.
pub fn pages_required(total_units: u64, units_per_page: u32) -> u32 {
    total_units.div_ceil(units_per_page as u64) as u32
}

/// Drive `fetch` over a provided ordered key set, exactly once per key.
///
/// Every record of a non-empty frame is passed through `decorate` together
/// with its key and a 1-based rank within that key. Skipped keys contribute
/// zero rows without halting the loop.
pub fn acquire_keyed<T, R, F, D>(
    keys: &[String],
    mut fetch: F,
    decorate: D,
) -> Result<AcquisitionReport<R>>
where
    F: FnMut(&str) -> Result<FetchOutcome<T>>,
    D: Fn(T, &str, u32) -> R,
{
    let mut report = AcquisitionReport::new();
    for key in keys {
        match fetch(key)? {
            FetchOutcome::Fetched(frame) => {
                let decorated: Vec<R> = frame
                    .into_iter()
                    .enumerate()
                    .map(|(idx, record)| decorate(record, key, idx as u32 + 1))
                    .collect();
                report.rows = fold_rows(report.rows, decorated);
            }
            FetchOutcome::Skipped { reason } => {
                warn!("No data for key {}: {}", key, reason);
                report.skipped.push(SkippedQuery {
                    key: key.clone(),
                    reason,
                });
            }
        }
    }
    Ok(report)
}

/// Drive `fetch` over pages `1..=n` where `n` covers `total_units` at
/// `units_per_page` records per request.
///
/// `decorate` receives each record with its page number and a global
/// 1-based rank offset by `units_per_page * (page - 1)`.
pub fn acquire_paged<T, R, F, D>(
    total_units: u64,
    units_per_page: u32,
    mut fetch: F,
    decorate: D,
) -> Result<AcquisitionReport<R>>
where
    F: FnMut(u32) -> Result<FetchOutcome<T>>,
    D: Fn(T, u32, u64) -> R,
{
    let pages = pages_required(total_units, units_per_page);
    let mut report = AcquisitionReport::new();
    for page in 1..=pages {
        match fetch(page)? {
            FetchOutcome::Fetched(frame) => {
                let offset = units_per_page as u64 * (page as u64 - 1);
                let decorated: Vec<R> = frame
                    .into_iter()
                    .enumerate()
                    .map(|(idx, record)| decorate(record, page, offset + idx as u64 + 1))
                    .collect();
                report.rows = fold_rows(report.rows, decorated);
            }
            FetchOutcome::Skipped { reason } => {
                warn!("No data for page {}: {}", page, reason);
                report.skipped.push(SkippedQuery {
                    key: page.to_string(),
                    reason,
                });
            }
        }
    }
    Ok(report)
}
