//! Named-range histograms for the dashboard's distribution charts.
//!
//! Output is sparse: buckets that end up empty are dropped, and the chart
//! layer relies on only non-empty buckets being present.

use serde::{Deserialize, Serialize};

use crate::record::{Field, PlanetRecord};

/// One labelled range. `max = None` leaves the range unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRange {
    pub label: String,
    pub min: f64,
    pub max: Option<f64>,
}

impl BinRange {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max: Some(max) }
    }

    pub fn open(label: impl Into<String>, min: f64) -> Self {
        Self { label: label.into(), min, max: None }
    }
}

/// Which side of each range is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Closure {
    /// `min ≤ v < max`; the final range also admits `v == max`.
    #[default]
    Left,
    /// `min < v ≤ max`; the first range also admits `v == min`.
    Right,
}

/// Ordered ranges plus the closure rule used to test them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinTable {
    pub ranges: Vec<BinRange>,
    #[serde(default)]
    pub closure: Closure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl BinTable {
    pub fn new(ranges: Vec<BinRange>) -> Self {
        Self { ranges, closure: Closure::Left }
    }

    pub fn with_closure(mut self, closure: Closure) -> Self {
        self.closure = closure;
        self
    }

    /// Index of the first range admitting `v`.
    pub fn locate(&self, v: f64) -> Option<usize> {
        if !v.is_finite() {
            return None;
        }
        let last = self.ranges.len().checked_sub(1)?;
        self.ranges.iter().enumerate().position(|(i, r)| {
            let above_min = match self.closure {
                Closure::Left => v >= r.min,
                Closure::Right => v > r.min || (i == 0 && v == r.min),
            };
            let below_max = match (r.max, self.closure) {
                (None, _) => true,
                (Some(max), Closure::Left) => v < max || (i == last && v == max),
                (Some(max), Closure::Right) => v <= max,
            };
            above_min && below_max
        })
    }

    /// Count values per range. Nulls and values outside every range are
    /// skipped; empty buckets are omitted; order follows `ranges`.
    pub fn distribution<I>(&self, values: I) -> Vec<Bucket>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut counts = vec![0usize; self.ranges.len()];
        for v in values.into_iter().flatten() {
            if let Some(i) = self.locate(v) {
                counts[i] += 1;
            }
        }
        self.ranges
            .iter()
            .zip(counts)
            .filter(|(_, c)| *c > 0)
            .map(|(r, count)| Bucket { label: r.label.clone(), count })
            .collect()
    }
}

/// Distribution of one numeric field across a record set.
pub fn field_distribution(records: &[PlanetRecord], field: Field, table: &BinTable) -> Vec<Bucket> {
    table.distribution(records.iter().map(|r| field.value(r)))
}

// ── Dashboard presets ─────────────────────────────────────────────────────────

/// Distance in light years.
pub fn distance_ly_table() -> BinTable {
    BinTable::new(vec![
        BinRange::new("0-100 ly", 0.0, 100.0),
        BinRange::new("100-500 ly", 100.0, 500.0),
        BinRange::new("500-1000 ly", 500.0, 1000.0),
        BinRange::new("1000-2000 ly", 1000.0, 2000.0),
        BinRange::open("2000+ ly", 2000.0),
    ])
}

pub fn radius_table() -> BinTable {
    BinTable::new(vec![
        BinRange::new("0-1 R⊕", 0.0, 1.0),
        BinRange::new("1-2 R⊕", 1.0, 2.0),
        BinRange::new("2-4 R⊕", 2.0, 4.0),
        BinRange::new("4-8 R⊕", 4.0, 8.0),
        BinRange::open("8+ R⊕", 8.0),
    ])
}

pub fn mass_table() -> BinTable {
    BinTable::new(vec![
        BinRange::new("0-1 M⊕", 0.0, 1.0),
        BinRange::new("1-5 M⊕", 1.0, 5.0),
        BinRange::new("5-10 M⊕", 5.0, 10.0),
        BinRange::new("10-20 M⊕", 10.0, 20.0),
        BinRange::open("20+ M⊕", 20.0),
    ])
}

pub fn orbital_period_table() -> BinTable {
    BinTable::new(vec![
        BinRange::new("0-10 days", 0.0, 10.0),
        BinRange::new("10-50 days", 10.0, 50.0),
        BinRange::new("50-100 days", 50.0, 100.0),
        BinRange::new("100-365 days", 100.0, 365.0),
        BinRange::open("1+ years", 365.0),
    ])
}

/// Habitability score in steps of 20; the top range includes 100.
pub fn score_table() -> BinTable {
    BinTable::new(vec![
        BinRange::new("0-20", 0.0, 20.0),
        BinRange::new("20-40", 20.0, 40.0),
        BinRange::new("40-60", 40.0, 60.0),
        BinRange::new("60-80", 60.0, 80.0),
        BinRange::new("80-100", 80.0, 100.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_ranges() -> BinTable {
        BinTable::new(vec![BinRange::new("0-1", 0.0, 1.0), BinRange::new("1-2", 1.0, 2.0)])
    }

    fn with_radius(name: &str, radius: Option<f64>) -> PlanetRecord {
        PlanetRecord { radius, ..PlanetRecord::named(name) }
    }

    #[test]
    fn left_closed_puts_boundary_value_in_upper_range() {
        let records = [with_radius("a", Some(1.0)), with_radius("b", Some(2.0))];
        let out = field_distribution(&records, Field::Radius, &two_ranges());
        // 1.0 opens "1-2"; 2.0 closes the last range.
        assert_eq!(out, vec![Bucket { label: "1-2".into(), count: 2 }]);
    }

    #[test]
    fn right_closed_puts_boundary_value_in_lower_range() {
        let records = [with_radius("a", Some(1.0)), with_radius("b", Some(2.0))];
        let table = two_ranges().with_closure(Closure::Right);
        let out = field_distribution(&records, Field::Radius, &table);
        assert_eq!(
            out,
            vec![
                Bucket { label: "0-1".into(), count: 1 },
                Bucket { label: "1-2".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn empty_buckets_are_dropped_and_order_kept() {
        let out = radius_table().distribution([Some(9.0), Some(0.5), Some(12.0)]);
        assert_eq!(
            out,
            vec![
                Bucket { label: "0-1 R⊕".into(), count: 1 },
                Bucket { label: "8+ R⊕".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn nulls_and_out_of_range_values_are_excluded() {
        let out = two_ranges().distribution([None, Some(-0.5), Some(2.5), Some(f64::NAN), Some(0.2)]);
        assert_eq!(out, vec![Bucket { label: "0-1".into(), count: 1 }]);
    }

    #[test]
    fn counts_sum_to_values_inside_the_union() {
        let values: Vec<Option<f64>> = (0..500)
            .map(|i| if i % 7 == 0 { None } else { Some((i as f64) * 0.37 - 20.0) })
            .collect();
        for closure in [Closure::Left, Closure::Right] {
            let table = orbital_period_table().with_closure(closure);
            let total: usize = table.distribution(values.iter().copied()).iter().map(|b| b.count).sum();
            let inside = values.iter().flatten().filter(|v| table.locate(**v).is_some()).count();
            let non_negative = values.iter().flatten().filter(|v| **v >= 0.0).count();
            assert_eq!(total, inside);
            assert_eq!(total, non_negative, "unbounded top range covers every v ≥ 0");
        }
    }

    #[test]
    fn score_table_includes_perfect_score() {
        let out = score_table().distribution([Some(100.0), Some(80.0), Some(0.0)]);
        assert_eq!(
            out,
            vec![
                Bucket { label: "0-20".into(), count: 1 },
                Bucket { label: "80-100".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn empty_table_locates_nothing() {
        let table = BinTable::new(Vec::new());
        assert_eq!(table.locate(1.0), None);
        assert!(table.distribution([Some(1.0)]).is_empty());
    }

    #[test]
    fn table_round_trips_through_config_json() {
        let json = r#"{ "ranges": [ { "label": "near", "min": 0, "max": 10 }, { "label": "far", "min": 10, "max": null } ] }"#;
        let table: BinTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.closure, Closure::Left);
        assert_eq!(table.locate(1e9), Some(1));
    }
}
