//! Per-category counts and averages for the overview and comparison panels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::binning::BinTable;
use crate::habitability::Factor;
use crate::record::PlanetRecord;
use crate::stats::{mean_of_present, Summary};

/// Group key for records without a value in the grouped field.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

fn group_by<'a, F>(records: &'a [PlanetRecord], key: F) -> Vec<(String, Vec<&'a PlanetRecord>)>
where
    F: Fn(&PlanetRecord) -> String,
{
    let mut groups: HashMap<String, Vec<&PlanetRecord>> = HashMap::new();
    for r in records {
        groups.entry(key(r)).or_default().push(r);
    }
    let mut out: Vec<_> = groups.into_iter().collect();
    // Largest first; ties broken by name for a stable order.
    out.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
    out
}

fn method_key(r: &PlanetRecord) -> String {
    r.discovery_method.clone().unwrap_or_else(|| UNKNOWN.into())
}

/// Leading spectral class letter ("G2 V" → "G"); unrecognised codes are kept
/// verbatim.
pub fn spectral_class(star_type: Option<&str>) -> String {
    let Some(code) = star_type.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN.into();
    };
    match code.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some(c @ ('O' | 'B' | 'A' | 'F' | 'G' | 'K' | 'M' | 'L' | 'T' | 'Y')) => c.to_string(),
        _ => code.to_string(),
    }
}

// ── Discovery methods ─────────────────────────────────────────────────────────

/// Record count per discovery method, largest first.
pub fn discovery_methods(records: &[PlanetRecord], top_n: Option<usize>) -> Vec<CategoryCount> {
    group_by(records, method_key)
        .into_iter()
        .take(top_n.unwrap_or(usize::MAX))
        .map(|(name, group)| CategoryCount { name, count: group.len() })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEfficiency {
    pub method: String,
    pub count: usize,
    pub mean_radius: Option<f64>,
    pub mean_mass: Option<f64>,
}

/// Typical planet size found by each discovery method.
pub fn method_efficiency(records: &[PlanetRecord], top_n: Option<usize>) -> Vec<MethodEfficiency> {
    group_by(records, method_key)
        .into_iter()
        .take(top_n.unwrap_or(usize::MAX))
        .map(|(method, group)| MethodEfficiency {
            method,
            count: group.len(),
            mean_radius: mean_of_present(group.iter().map(|r| r.radius)),
            mean_mass: mean_of_present(group.iter().map(|r| r.mass)),
        })
        .collect()
}

// ── Star types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarTypeStats {
    pub star_type: String,
    pub count: usize,
    pub mean_score: Option<f64>,
    pub mean_radius: Option<f64>,
    pub mean_mass: Option<f64>,
}

pub fn star_type_analysis(records: &[PlanetRecord]) -> Vec<StarTypeStats> {
    group_by(records, |r| spectral_class(r.star_type.as_deref()))
        .into_iter()
        .map(|(star_type, group)| StarTypeStats {
            star_type,
            count: group.len(),
            mean_score: mean_of_present(group.iter().map(|r| r.score())),
            mean_radius: mean_of_present(group.iter().map(|r| r.radius)),
            mean_mass: mean_of_present(group.iter().map(|r| r.mass)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub star_type: String,
    /// One count per column of [`Heatmap::columns`], zero-filled.
    pub counts: Vec<usize>,
}

/// Star class × habitability score range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Heatmap {
    pub columns: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

/// Scored records only, one column per range of `table`.
pub fn star_score_heatmap(records: &[PlanetRecord], table: &BinTable) -> Heatmap {
    let columns: Vec<String> = table.ranges.iter().map(|r| r.label.clone()).collect();
    let rows = group_by(records, |r| spectral_class(r.star_type.as_deref()))
        .into_iter()
        .map(|(star_type, group)| {
            let mut counts = vec![0usize; columns.len()];
            for i in group.iter().filter_map(|r| r.score()).filter_map(|s| table.locate(s)) {
                counts[i] += 1;
            }
            HeatmapRow { star_type, counts }
        })
        .filter(|row| row.counts.iter().any(|&c| c > 0))
        .collect();
    Heatmap { columns, rows }
}

// ── Score and size classes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBands {
    /// ≥ 80.
    pub high: usize,
    /// 50 to < 80.
    pub medium: usize,
    /// < 50.
    pub low: usize,
    pub unscored: usize,
}

pub fn score_bands(records: &[PlanetRecord]) -> ScoreBands {
    let mut bands = ScoreBands::default();
    for r in records {
        match r.score() {
            Some(s) if s >= 80.0 => bands.high += 1,
            Some(s) if s >= 50.0 => bands.medium += 1,
            Some(_) => bands.low += 1,
            None => bands.unscored += 1,
        }
    }
    bands
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeClasses {
    /// 0.8-1.2 R⊕.
    pub earth_like: usize,
    /// Above 1.5 and up to 2.5 R⊕.
    pub super_earth: usize,
    /// Above 2.5 R⊕.
    pub gas_giant: usize,
}

pub fn size_classes(records: &[PlanetRecord]) -> SizeClasses {
    let mut classes = SizeClasses::default();
    for r in records.iter().filter_map(|r| r.radius) {
        if (0.8..=1.2).contains(&r) {
            classes.earth_like += 1;
        } else if r > 1.5 && r <= 2.5 {
            classes.super_earth += 1;
        } else if r > 2.5 {
            classes.gas_giant += 1;
        }
    }
    classes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMultiplicity {
    pub single_planet: usize,
    pub multi_planet: usize,
}

/// Host systems with one vs. several catalogued planets. Records without a
/// host star are not counted.
pub fn system_multiplicity(records: &[PlanetRecord]) -> SystemMultiplicity {
    let mut per_host: HashMap<&str, usize> = HashMap::new();
    for host in records.iter().filter_map(|r| r.host_star.as_deref()) {
        *per_host.entry(host).or_default() += 1;
    }
    let multi_planet = per_host.values().filter(|&&n| n > 1).count();
    SystemMultiplicity { single_planet: per_host.len() - multi_planet, multi_planet }
}

// ── Diversity ─────────────────────────────────────────────────────────────────

/// One spoke of the diversity radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityAxis {
    pub subject: String,
    pub count: usize,
    /// `count` rescaled so the largest axis reads 100; all 0 when every
    /// count is 0.
    pub value: f64,
}

/// Size, orbit and recency mix of the catalog.
///
/// Small < 2 R⊕ ≤ medium < 6 R⊕ ≤ large; close orbits < 50 days ≤ far;
/// recent finds from 2020 on. Records missing the field are not counted on
/// that axis.
pub fn diversity(records: &[PlanetRecord]) -> Vec<DiversityAxis> {
    let count = |pred: fn(&PlanetRecord) -> bool| records.iter().filter(|r| pred(r)).count();
    let axes = [
        ("Small Planets", count(|r| r.radius.is_some_and(|x| x < 2.0))),
        ("Medium Planets", count(|r| r.radius.is_some_and(|x| (2.0..6.0).contains(&x)))),
        ("Large Planets", count(|r| r.radius.is_some_and(|x| x >= 6.0))),
        ("Close Orbits", count(|r| r.orbital_period.is_some_and(|p| p < 50.0))),
        ("Far Orbits", count(|r| r.orbital_period.is_some_and(|p| p >= 50.0))),
        ("Recent Finds", count(|r| r.discovery_year.is_some_and(|y| y >= 2020))),
    ];
    let max = axes.iter().map(|&(_, n)| n).max().unwrap_or(0);
    axes.into_iter()
        .map(|(subject, count)| DiversityAxis {
            subject: subject.to_string(),
            count,
            value: if max > 0 { count as f64 / max as f64 * 100.0 } else { 0.0 },
        })
        .collect()
}

// ── Score summary and factor aggregates ───────────────────────────────────────

/// Summary of the habitability scores of all scored records.
pub fn score_summary(records: &[PlanetRecord]) -> Option<Summary> {
    let scores: Vec<f64> = records.iter().filter_map(|r| r.score()).collect();
    Summary::of(&scores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAggregate {
    pub factor: Factor,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    /// Mean sub-score as a fraction of 100.
    pub impact: f64,
}

/// Sub-score statistics of each factor over the records that evaluated it.
pub fn factor_aggregates(records: &[PlanetRecord]) -> Vec<FactorAggregate> {
    Factor::ALL
        .iter()
        .filter_map(|&factor| {
            let values: Vec<f64> = records
                .iter()
                .filter_map(|r| r.habitability.as_ref()?.breakdown.get(&factor))
                .map(|f| f.score100)
                .collect();
            let s = Summary::of(&values)?;
            Some(FactorAggregate {
                factor,
                count: s.count,
                mean: s.mean,
                min: s.min,
                max: s.max,
                std: s.std,
                impact: s.mean / 100.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::{score_table, BinRange};
    use crate::habitability::{score_all, ScorerConfig};

    fn found_by(name: &str, method: Option<&str>, radius: Option<f64>) -> PlanetRecord {
        PlanetRecord {
            discovery_method: method.map(String::from),
            radius,
            ..PlanetRecord::named(name)
        }
    }

    #[test]
    fn methods_sorted_by_count_then_name() {
        let records = [
            found_by("a", Some("Transit"), None),
            found_by("b", Some("Radial Velocity"), None),
            found_by("c", Some("Transit"), None),
            found_by("d", None, None),
            found_by("e", Some("Imaging"), None),
        ];
        let out = discovery_methods(&records, None);
        let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Transit", "Imaging", "Radial Velocity", "Unknown"]);
        assert_eq!(out[0].count, 2);
        assert_eq!(discovery_methods(&records, Some(2)).len(), 2);
    }

    #[test]
    fn method_efficiency_averages_present_sizes() {
        let records = [
            found_by("a", Some("Transit"), Some(1.0)),
            found_by("b", Some("Transit"), Some(3.0)),
            found_by("c", Some("Transit"), None),
        ];
        let out = method_efficiency(&records, None);
        assert_eq!(out[0].count, 3);
        assert_eq!(out[0].mean_radius, Some(2.0));
        assert_eq!(out[0].mean_mass, None);
    }

    #[test]
    fn spectral_class_extraction() {
        assert_eq!(spectral_class(Some("G2 V")), "G");
        assert_eq!(spectral_class(Some(" m4.5 ")), "M");
        assert_eq!(spectral_class(Some("DA")), "DA");
        assert_eq!(spectral_class(Some("")), UNKNOWN);
        assert_eq!(spectral_class(None), UNKNOWN);
    }

    #[test]
    fn star_types_group_by_class() {
        let mut records = vec![
            PlanetRecord { star_type: Some("G2 V".into()), temperature: Some(288.0), ..PlanetRecord::named("a") },
            PlanetRecord { star_type: Some("G8".into()), radius: Some(2.0), ..PlanetRecord::named("b") },
            PlanetRecord { star_type: Some("M3 V".into()), ..PlanetRecord::named("c") },
        ];
        score_all(&mut records, &ScorerConfig::default());
        let out = star_type_analysis(&records);
        assert_eq!(out[0].star_type, "G");
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].mean_radius, Some(2.0));
        assert_eq!(out[1].star_type, "M");
        assert_eq!(out[1].mean_score, None);
    }

    #[test]
    fn heatmap_is_zero_filled_over_score_columns() {
        let mut records = vec![
            PlanetRecord { star_type: Some("K1".into()), temperature: Some(288.0), ..PlanetRecord::named("a") },
            PlanetRecord { star_type: Some("K5".into()), temperature: Some(900.0), ..PlanetRecord::named("b") },
            PlanetRecord { star_type: Some("F".into()), ..PlanetRecord::named("c") },
        ];
        score_all(&mut records, &ScorerConfig::default());
        let map = star_score_heatmap(&records, &score_table());
        assert_eq!(map.columns.len(), 5);
        assert_eq!(map.rows.len(), 1, "unscored F row is dropped");
        assert_eq!(map.rows[0].star_type, "K");
        assert_eq!(map.rows[0].counts, [1, 0, 0, 0, 1]);
    }

    #[test]
    fn heatmap_follows_custom_score_table() {
        let mut records = vec![
            PlanetRecord { star_type: Some("G2".into()), temperature: Some(288.0), ..PlanetRecord::named("a") },
            PlanetRecord { star_type: Some("G5".into()), temperature: Some(200.0), ..PlanetRecord::named("b") },
        ];
        score_all(&mut records, &ScorerConfig::default());
        let table = BinTable::new(vec![BinRange::new("poor", 0.0, 75.0), BinRange::new("good", 75.0, 100.0)]);
        let map = star_score_heatmap(&records, &table);
        assert_eq!(map.columns, ["poor", "good"]);
        assert_eq!(map.rows[0].counts, [1, 1], "200 K scores 50, 288 K scores 100");
    }

    #[test]
    fn diversity_axes_split_at_boundaries() {
        let rec = |name: &str, radius: Option<f64>, period: Option<f64>, year: Option<i32>| PlanetRecord {
            radius,
            orbital_period: period,
            discovery_year: year,
            ..PlanetRecord::named(name)
        };
        let records = [
            rec("a", Some(1.99), Some(49.9), Some(2020)),
            rec("b", Some(2.0), Some(50.0), Some(2019)),
            rec("c", Some(5.99), Some(365.0), None),
            rec("d", Some(6.0), None, Some(2024)),
            rec("e", None, Some(3.0), Some(2021)),
        ];
        let axes = diversity(&records);
        let counts: Vec<(&str, usize)> = axes.iter().map(|a| (a.subject.as_str(), a.count)).collect();
        assert_eq!(
            counts,
            [
                ("Small Planets", 1),
                ("Medium Planets", 2),
                ("Large Planets", 1),
                ("Close Orbits", 2),
                ("Far Orbits", 2),
                ("Recent Finds", 3),
            ]
        );
        assert_eq!(axes[5].value, 100.0, "largest axis reads 100");
        assert!((axes[1].value - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn diversity_of_empty_catalog_is_all_zero() {
        let axes = diversity(&[PlanetRecord::named("bare")]);
        assert_eq!(axes.len(), 6);
        assert!(axes.iter().all(|a| a.count == 0 && a.value == 0.0));
    }

    #[test]
    fn score_bands_and_size_classes() {
        let mut records = vec![
            PlanetRecord { temperature: Some(288.0), ..found_by("a", None, Some(1.0)) },
            PlanetRecord { temperature: Some(288.0), ..found_by("b", None, Some(2.2)) },
            found_by("c", None, Some(11.0)),
            found_by("d", None, None),
        ];
        score_all(&mut records, &ScorerConfig::default());
        let bands = score_bands(&records);
        assert_eq!(bands.high, 1);
        assert_eq!(bands.medium, 1);
        assert_eq!(bands.low, 1, "gas giant is excluded to 0");
        assert_eq!(bands.unscored, 1);

        let sizes = size_classes(&records);
        assert_eq!(sizes, SizeClasses { earth_like: 1, super_earth: 1, gas_giant: 1 });
    }

    #[test]
    fn multiplicity_counts_hosts() {
        let host = |name: &str, h: Option<&str>| PlanetRecord {
            host_star: h.map(String::from),
            ..PlanetRecord::named(name)
        };
        let records = [
            host("b", Some("TRAPPIST-1")),
            host("c", Some("TRAPPIST-1")),
            host("d", Some("Kepler-22")),
            host("e", None),
        ];
        assert_eq!(
            system_multiplicity(&records),
            SystemMultiplicity { single_planet: 1, multi_planet: 1 }
        );
    }

    #[test]
    fn factor_aggregates_cover_evaluated_factors_only() {
        let mut records = vec![
            PlanetRecord { temperature: Some(288.0), ..PlanetRecord::named("a") },
            PlanetRecord { temperature: Some(200.0), mass: Some(1.0), ..PlanetRecord::named("b") },
        ];
        score_all(&mut records, &ScorerConfig::default());
        let aggs = factor_aggregates(&records);
        let factors: Vec<Factor> = aggs.iter().map(|a| a.factor).collect();
        assert_eq!(factors, [Factor::Temperature, Factor::Mass]);
        let t = &aggs[0];
        assert_eq!(t.count, 2);
        assert!((t.mean - 75.0).abs() < 1e-9);
        assert_eq!((t.min, t.max), (50.0, 100.0));
        assert!((t.impact - 0.75).abs() < 1e-9);
    }

    #[test]
    fn score_summary_skips_unscored() {
        let mut records = vec![
            PlanetRecord { temperature: Some(288.0), ..PlanetRecord::named("a") },
            PlanetRecord::named("b"),
        ];
        score_all(&mut records, &ScorerConfig::default());
        let s = score_summary(&records).unwrap();
        assert_eq!(s.count, 1);
        assert!((s.mean - 100.0).abs() < 1e-9);
        assert!(score_summary(&[]).is_none());
    }
}
