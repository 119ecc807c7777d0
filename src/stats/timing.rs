//! Daily-average listening rates by year and hour of day.

use chrono::{Datelike, NaiveDate, Timelike};
use std::ops::RangeInclusive;

use super::Scrobble;

/// Daily-average scrobble rates per year and hour of day.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingTable {
    pub years: Vec<i32>,
    /// One row per year, 24 hourly daily-average rates.
    pub rates: Vec<[f64; 24]>,
}

/// Count scrobbles per (year, hour of day) over the complete-year range,
/// then normalize each year by its day count so leap years stay
/// comparable. Scrobbles outside the range are ignored.
pub fn daily_average_by_hour(
    scrobbles: &[Scrobble],
    complete_years: RangeInclusive<i32>,
) -> TimingTable {
    let years: Vec<i32> = complete_years.collect();
    let mut counts = vec![[0u64; 24]; years.len()];

    for scrobble in scrobbles {
        let year = scrobble.at.year();
        if let Some(row) = years.iter().position(|&y| y == year) {
            counts[row][scrobble.at.hour() as usize] += 1;
        }
    }

    let rates = years
        .iter()
        .zip(&counts)
        .map(|(&year, row)| {
            let days = days_in_year(year) as f64;
            let mut normalized = [0f64; 24];
            for (hour, &count) in row.iter().enumerate() {
                normalized[hour] = count as f64 / days;
            }
            normalized
        })
        .collect();

    TimingTable { years, rates }
}

fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}
