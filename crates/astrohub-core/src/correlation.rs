//! Pairwise Pearson correlations across a fixed metric list.
//!
//! Each pair uses only the records that have both metrics (pairwise-complete
//! observations), so a record missing one metric still feeds every other
//! pair. Every unordered pair is computed once and emitted in both orders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::PlanetRecord;
use crate::stats::{pearson, CorrelationStrength, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Score,
    Radius,
    Mass,
    Distance,
    OrbitalPeriod,
    Temperature,
}

pub const DEFAULT_METRICS: [Metric; 6] = [
    Metric::Score,
    Metric::Radius,
    Metric::Mass,
    Metric::Distance,
    Metric::OrbitalPeriod,
    Metric::Temperature,
];

impl Metric {
    pub fn value(self, record: &PlanetRecord) -> Option<f64> {
        match self {
            Metric::Score => record.score(),
            Metric::Radius => record.radius,
            Metric::Mass => record.mass,
            Metric::Distance => record.distance,
            Metric::OrbitalPeriod => record.orbital_period,
            Metric::Temperature => record.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationEntry {
    pub metric1: Metric,
    pub metric2: Metric,
    /// |r|.
    pub correlation: f64,
    pub strength: CorrelationStrength,
    pub direction: Direction,
    /// Records with both metrics present.
    pub samples: usize,
}

/// Paired values of two metrics over the records that have both.
pub fn paired_values(records: &[PlanetRecord], a: Metric, b: Metric) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|r| Some((a.value(r)?, b.value(r)?)))
        .unzip()
}

/// r and sample count, `None` when no record has both metrics.
fn correlate(records: &[PlanetRecord], a: Metric, b: Metric) -> Option<(f64, usize)> {
    let (xs, ys) = paired_values(records, a, b);
    let r = pearson(&xs, &ys).ok()?;
    Some((r, xs.len()))
}

#[cfg(not(feature = "threading"))]
fn correlate_pairs(records: &[PlanetRecord], pairs: &[(Metric, Metric)]) -> Vec<Option<(f64, usize)>> {
    pairs.iter().map(|&(a, b)| correlate(records, a, b)).collect()
}

#[cfg(feature = "threading")]
fn correlate_pairs(records: &[PlanetRecord], pairs: &[(Metric, Metric)]) -> Vec<Option<(f64, usize)>> {
    use rayon::prelude::*;
    pairs.par_iter().map(|&(a, b)| correlate(records, a, b)).collect()
}

/// Correlation entries for every ordered pair of distinct metrics, in
/// `metrics` order (row-major). Pairs with no complete observation are left
/// out.
pub fn correlation_matrix(records: &[PlanetRecord], metrics: &[Metric]) -> Vec<CorrelationEntry> {
    let mut unordered: Vec<(Metric, Metric)> = Vec::new();
    for (i, &a) in metrics.iter().enumerate() {
        for &b in &metrics[i + 1..] {
            if a != b && !unordered.contains(&(a, b)) && !unordered.contains(&(b, a)) {
                unordered.push((a, b));
            }
        }
    }

    let results: HashMap<(Metric, Metric), (f64, usize)> = unordered
        .iter()
        .zip(correlate_pairs(records, &unordered))
        .filter_map(|(&pair, res)| res.map(|v| (pair, v)))
        .collect();

    let mut entries = Vec::new();
    for &m1 in metrics {
        for &m2 in metrics {
            if m1 == m2 {
                continue;
            }
            let Some(&(r, samples)) = results.get(&(m1, m2)).or_else(|| results.get(&(m2, m1))) else {
                continue;
            };
            entries.push(CorrelationEntry {
                metric1: m1,
                metric2: m2,
                correlation: r.abs(),
                strength: CorrelationStrength::classify(r),
                direction: Direction::of(r),
                samples,
            });
        }
    }
    entries
}
