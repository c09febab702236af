//! Discovery timeline: per-year aggregates and the running total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::PlanetRecord;
use crate::stats::mean_of_present;

/// Scores at or above this count as high scorers.
pub const HIGH_SCORE: f64 = 80.0;

/// Inclusive range of discovery years to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub from: i32,
    pub to: i32,
}

impl YearWindow {
    pub fn contains(&self, year: i32) -> bool {
        year >= self.from && year <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPoint {
    pub year: i32,
    pub count: usize,
    /// Over the year's scored records.
    pub mean_score: Option<f64>,
    /// Over the year's records with a radius.
    pub mean_radius: Option<f64>,
    pub high_score_count: usize,
    /// High scorers as a percentage of `count`.
    pub high_score_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub year: i32,
    pub yearly: usize,
    pub cumulative: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub yearly: Vec<YearPoint>,
    pub cumulative: Vec<CumulativePoint>,
}

/// Group records by discovery year. Records without a year, or outside
/// `window`, are skipped.
pub fn discovery_timeline(records: &[PlanetRecord], window: Option<YearWindow>) -> Timeline {
    let mut by_year: BTreeMap<i32, Vec<&PlanetRecord>> = BTreeMap::new();
    for r in records {
        let Some(year) = r.discovery_year else { continue };
        if window.map_or(true, |w| w.contains(year)) {
            by_year.entry(year).or_default().push(r);
        }
    }

    let yearly: Vec<YearPoint> = by_year
        .into_iter()
        .map(|(year, group)| {
            let count = group.len();
            let high_score_count = group
                .iter()
                .filter(|r| r.score().is_some_and(|s| s >= HIGH_SCORE))
                .count();
            YearPoint {
                year,
                count,
                mean_score: mean_of_present(group.iter().map(|r| r.score())),
                mean_radius: mean_of_present(group.iter().map(|r| r.radius)),
                high_score_count,
                high_score_ratio: high_score_count as f64 / count as f64 * 100.0,
            }
        })
        .collect();

    let cumulative = yearly
        .iter()
        .scan(0usize, |total, p| {
            *total += p.count;
            Some(CumulativePoint { year: p.year, yearly: p.count, cumulative: *total })
        })
        .collect();

    Timeline { yearly, cumulative }
}
