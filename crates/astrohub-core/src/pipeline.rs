//! Pipeline orchestrator: normalize, score, then build every dashboard dataset.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binning::{
    distance_ly_table, field_distribution, mass_table, orbital_period_table, radius_table,
    score_table, BinTable, Bucket,
};
use crate::categories::{
    discovery_methods, diversity, factor_aggregates, method_efficiency, score_bands, score_summary,
    size_classes, star_score_heatmap, star_type_analysis, system_multiplicity, CategoryCount,
    DiversityAxis, FactorAggregate, Heatmap, MethodEfficiency, ScoreBands, SizeClasses, StarTypeStats,
    SystemMultiplicity,
};
use crate::correlation::{correlation_matrix, CorrelationEntry, Metric, DEFAULT_METRICS};
use crate::habitability::{score_all, ScorerConfig};
use crate::normalize::{normalize_batch, Rejected};
use crate::record::{Field, PlanetRecord};
use crate::stats::Summary;
use crate::temporal::{discovery_timeline, Timeline, YearWindow};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Range tables for each distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinTables {
    pub distance_ly: BinTable,
    pub radius: BinTable,
    pub mass: BinTable,
    pub orbital_period: BinTable,
    pub score: BinTable,
}

impl Default for BinTables {
    fn default() -> Self {
        Self {
            distance_ly: distance_ly_table(),
            radius: radius_table(),
            mass: mass_table(),
            orbital_period: orbital_period_table(),
            score: score_table(),
        }
    }
}

/// Everything a run can be tuned with. Defaults reproduce the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
    pub scorer: ScorerConfig,
    pub bins: BinTables,
    /// Correlation matrix rows and columns, in display order.
    pub metrics: Vec<Metric>,
    /// Discovery years to keep in the timeline; `None` keeps all.
    pub years: Option<YearWindow>,
    /// Length of the discovery method rankings; `None` keeps all.
    pub top_n: Option<usize>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerConfig::default(),
            bins: BinTables::default(),
            metrics: DEFAULT_METRICS.to_vec(),
            years: None,
            top_n: Some(8),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub distance_ly: Vec<Bucket>,
    pub radius: Vec<Bucket>,
    pub mass: Vec<Bucket>,
    pub orbital_period: Vec<Bucket>,
    pub score: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub discovery_methods: Vec<CategoryCount>,
    pub method_efficiency: Vec<MethodEfficiency>,
    pub star_types: Vec<StarTypeStats>,
    pub star_score_heatmap: Heatmap,
    pub score_bands: ScoreBands,
    pub size_classes: SizeClasses,
    pub systems: SystemMultiplicity,
    pub diversity: Vec<DiversityAxis>,
    pub factors: Vec<FactorAggregate>,
}

/// Full output of one analytics run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Normalized and scored, in input order.
    pub records: Vec<PlanetRecord>,
    pub rejected: Vec<Rejected>,
    pub distributions: Distributions,
    pub correlations: Vec<CorrelationEntry>,
    pub timeline: Timeline,
    pub categories: Categories,
    /// Habitability scores of the scored records.
    pub summary: Option<Summary>,
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// Normalize raw catalog rows and analyze the survivors.
pub fn run(raws: &[Value], cfg: &AnalyticsConfig) -> AnalyticsReport {
    let batch = normalize_batch(raws);
    AnalyticsReport { rejected: batch.rejected, ..analyze(batch.records, cfg) }
}

/// Score already-normalized records and build every dataset from them.
pub fn analyze(mut records: Vec<PlanetRecord>, cfg: &AnalyticsConfig) -> AnalyticsReport {
    score_all(&mut records, &cfg.scorer);

    let bins = &cfg.bins;
    let distributions = Distributions {
        distance_ly: field_distribution(&records, Field::DistanceLy, &bins.distance_ly),
        radius: field_distribution(&records, Field::Radius, &bins.radius),
        mass: field_distribution(&records, Field::Mass, &bins.mass),
        orbital_period: field_distribution(&records, Field::OrbitalPeriod, &bins.orbital_period),
        score: field_distribution(&records, Field::Score, &bins.score),
    };

    let categories = Categories {
        discovery_methods: discovery_methods(&records, cfg.top_n),
        method_efficiency: method_efficiency(&records, cfg.top_n),
        star_types: star_type_analysis(&records),
        star_score_heatmap: star_score_heatmap(&records, &bins.score),
        score_bands: score_bands(&records),
        size_classes: size_classes(&records),
        systems: system_multiplicity(&records),
        diversity: diversity(&records),
        factors: factor_aggregates(&records),
    };

    let correlations = correlation_matrix(&records, &cfg.metrics);
    let timeline = discovery_timeline(&records, cfg.years);
    let summary = score_summary(&records);

    log::debug!(
        "analyzed {} records: {} correlation entries, {} timeline years",
        records.len(),
        correlations.len(),
        timeline.yearly.len()
    );

    AnalyticsReport {
        records,
        rejected: Vec::new(),
        distributions,
        correlations,
        timeline,
        categories,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Vec<Value> {
        vec![
            json!({ "pl_name": "Kepler-452 b", "hostname": "Kepler-452", "discoverymethod": "Transit",
                    "disc_year": 2015, "pl_rade": 1.63, "pl_eqt": 265, "pl_orbper": 384.8,
                    "sy_dist": 551.7, "pl_bmasse": 5.0, "st_spectype": "G2" }),
            json!({ "pl_name": "TRAPPIST-1 e", "hostname": "TRAPPIST-1", "discoverymethod": "Transit",
                    "disc_year": 2017, "pl_rade": 0.92, "pl_eqt": 251, "pl_orbper": 6.1,
                    "sy_dist": 12.4, "pl_bmasse": 0.69, "st_spectype": "M8 V" }),
            json!({ "pl_name": "TRAPPIST-1 f", "hostname": "TRAPPIST-1", "discoverymethod": "Transit",
                    "disc_year": 2017, "pl_rade": 1.05, "pl_eqt": 219, "pl_orbper": 9.2,
                    "sy_dist": 12.4, "pl_bmasse": 1.04, "st_spectype": "M8 V" }),
            json!({ "pl_name": "51 Peg b", "hostname": "51 Peg", "discoverymethod": "Radial Velocity",
                    "disc_year": 1995, "pl_rade": 14.0, "pl_eqt": 1260, "pl_orbper": 4.2,
                    "sy_dist": 15.5, "pl_bmasse": 150.0 }),
            json!({ "pl_rade": 2.0 }),
            json!({ "pl_name": "TRAPPIST-1 e" }),
        ]
    }

    #[test]
    fn end_to_end_report() {
        let report = run(&catalog(), &AnalyticsConfig::default());

        assert_eq!(report.records.len(), 4);
        let rejected: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, [4, 5], "nameless row and duplicate name are rejected");
        assert!(report.records.iter().all(|r| r.habitability.is_some()));

        let years: Vec<(i32, usize)> =
            report.timeline.cumulative.iter().map(|p| (p.year, p.cumulative)).collect();
        assert_eq!(years, [(1995, 1), (2015, 2), (2017, 4)]);

        let radius_total: usize = report.distributions.radius.iter().map(|b| b.count).sum();
        assert_eq!(radius_total, 4);
        assert_eq!(report.categories.discovery_methods[0].name, "Transit");
        assert_eq!(report.categories.discovery_methods[0].count, 3);
        assert_eq!(report.categories.systems, SystemMultiplicity { single_planet: 2, multi_planet: 1 });
        let diversity: Vec<usize> = report.categories.diversity.iter().map(|a| a.count).collect();
        assert_eq!(diversity, [3, 0, 1, 3, 1, 0]);

        let hot_jupiter = &report.records[3];
        assert_eq!(hot_jupiter.score(), Some(0.0), "hard limits exclude 51 Peg b");
        assert_eq!(report.categories.score_bands.low, 1);
        assert_eq!(report.summary.unwrap().count, 4);
    }

    #[test]
    fn correlations_cover_configured_metrics() {
        let cfg = AnalyticsConfig {
            metrics: vec![Metric::Radius, Metric::Mass, Metric::Temperature],
            ..AnalyticsConfig::default()
        };
        let report = run(&catalog(), &cfg);
        assert_eq!(report.correlations.len(), 3 * 2);
        assert!(report.correlations.iter().all(|e| e.samples == 4));
    }

    #[test]
    fn year_window_and_top_n_apply() {
        let cfg = AnalyticsConfig {
            years: Some(YearWindow { from: 2000, to: 2020 }),
            top_n: Some(1),
            ..AnalyticsConfig::default()
        };
        let report = run(&catalog(), &cfg);
        assert_eq!(report.timeline.yearly.len(), 2);
        assert_eq!(report.categories.discovery_methods.len(), 1);
        assert_eq!(report.categories.method_efficiency.len(), 1);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let report = run(&[], &AnalyticsConfig::default());
        assert!(report.records.is_empty());
        assert!(report.correlations.is_empty());
        assert!(report.distributions.radius.is_empty());
        assert!(report.summary.is_none());
    }

    #[test]
    fn config_loads_from_partial_json() {
        let cfg: AnalyticsConfig = serde_json::from_str(
            r#"{ "topN": 3, "metrics": ["radius", "mass"], "scorer": { "maxFlarePenalty": 0.2 },
                 "bins": { "radius": { "ranges": [ { "label": "small", "min": 0, "max": 2 } ], "closure": "right" } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.top_n, Some(3));
        assert_eq!(cfg.metrics, [Metric::Radius, Metric::Mass]);
        assert_eq!(cfg.scorer.max_flare_penalty, 0.2);
        assert_eq!(cfg.bins.radius.ranges.len(), 1);
        assert_eq!(cfg.bins.mass, mass_table());
        assert_eq!(cfg.scorer.weights, ScorerConfig::default().weights);
    }

    #[test]
    fn report_serializes_with_dashboard_keys() {
        let report = run(&catalog()[..2], &AnalyticsConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        for key in ["records", "rejected", "distributions", "correlations", "timeline", "categories", "summary"] {
            assert!(json.get(key).is_some(), "missing `{key}`");
        }
        assert!(json["distributions"].get("orbitalPeriod").is_some());
        assert!(json["categories"].get("starScoreHeatmap").is_some());
        assert_eq!(json["categories"]["diversity"][0]["subject"], "Small Planets");
        assert_eq!(json["records"][0]["name"], "Kepler-452 b");
    }
}
