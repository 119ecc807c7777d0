//! The three dataset pipelines: acquire or load from cache, aggregate,
//! hand the derived tables off to the results directory.

pub mod chart;
pub mod geographic;
pub mod history;
