//! Time-boxed catalog and report cache.
//!
//! The caller supplies the clock (`now_ms`, milliseconds since any fixed
//! epoch), so the cache behaves the same natively, in the browser and in
//! tests. Records and the derived report expire independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{normalize_batch, Rejected};
use crate::pipeline::{analyze, AnalyticsConfig, AnalyticsReport};
use crate::record::PlanetRecord;

/// Lifetimes in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheTtl {
    pub records_ms: u64,
    pub report_ms: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self { records_ms: 24 * 60 * 60 * 1000, report_ms: 5 * 60 * 1000 }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at_ms: u64,
}

impl<T> Entry<T> {
    fn fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < ttl_ms
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    ttl: CacheTtl,
    records: Option<Entry<Vec<PlanetRecord>>>,
    report: Option<Entry<(AnalyticsConfig, AnalyticsReport)>>,
}

impl CatalogCache {
    pub fn new(ttl: CacheTtl) -> Self {
        Self { ttl, records: None, report: None }
    }

    pub fn ttl(&self) -> CacheTtl {
        self.ttl
    }

    /// Replace the cached catalog with freshly fetched raw rows. Returns the
    /// rows that failed normalization.
    pub fn store(&mut self, raws: &[Value], now_ms: u64) -> Vec<Rejected> {
        let batch = normalize_batch(raws);
        log::debug!("catalog cache stored {} records", batch.records.len());
        self.records = Some(Entry { value: batch.records, stored_at_ms: now_ms });
        self.report = None;
        batch.rejected
    }

    /// Cached records, or `None` when nothing is stored or the entry expired.
    pub fn records(&self, now_ms: u64) -> Option<&[PlanetRecord]> {
        self.records
            .as_ref()
            .filter(|e| e.fresh(now_ms, self.ttl.records_ms))
            .map(|e| e.value.as_slice())
    }

    /// Report over the cached records, rebuilt when it expired or `cfg`
    /// changed. `None` when the records themselves are missing or stale.
    pub fn report(&mut self, cfg: &AnalyticsConfig, now_ms: u64) -> Option<&AnalyticsReport> {
        let records = self.records(now_ms)?;
        let reusable = self
            .report
            .as_ref()
            .is_some_and(|e| e.fresh(now_ms, self.ttl.report_ms) && e.value.0 == *cfg);
        if !reusable {
            log::debug!("rebuilding cached report over {} records", records.len());
            let report = analyze(records.to_vec(), cfg);
            self.report = Some(Entry { value: (cfg.clone(), report), stored_at_ms: now_ms });
        }
        self.report.as_ref().map(|e| &e.value.1)
    }

    /// Drop everything, forcing the next caller to refetch.
    pub fn invalidate(&mut self) {
        self.records = None;
        self.report = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: CacheTtl = CacheTtl { records_ms: 1_000, report_ms: 100 };

    fn rows() -> Vec<Value> {
        vec![
            json!({ "name": "a", "temperature": 288, "discoveryYear": 2020 }),
            json!({ "name": "b", "radius": 1.4, "discoveryYear": 2021 }),
            json!({ "radius": 3 }),
        ]
    }

    #[test]
    fn records_expire_after_ttl() {
        let mut cache = CatalogCache::new(TTL);
        assert!(cache.records(0).is_none());

        let rejected = cache.store(&rows(), 10);
        assert_eq!(rejected.len(), 1);
        assert_eq!(cache.records(10).map(<[_]>::len), Some(2));
        assert!(cache.records(1_009).is_some());
        assert!(cache.records(1_010).is_none(), "entry is stale once ttl has elapsed");
    }

    #[test]
    fn report_is_reused_while_fresh() {
        let mut cache = CatalogCache::new(TTL);
        cache.store(&rows(), 0);
        let cfg = AnalyticsConfig::default();

        let first = cache.report(&cfg, 0).cloned().unwrap();
        assert_eq!(first.records.len(), 2);
        assert!(first.records.iter().all(|r| r.habitability.is_some()));

        let again = cache.report(&cfg, 50).cloned().unwrap();
        assert_eq!(first, again);
        assert!(cache.report(&cfg, 500).is_some(), "stale report is rebuilt from fresh records");
        assert!(cache.report(&cfg, 5_000).is_none(), "no report once records expire");
    }

    #[test]
    fn config_change_rebuilds_report() {
        let mut cache = CatalogCache::new(TTL);
        cache.store(&rows(), 0);
        let full = cache.report(&AnalyticsConfig::default(), 0).unwrap().timeline.yearly.len();
        assert_eq!(full, 2);

        let cfg = AnalyticsConfig {
            years: Some(crate::temporal::YearWindow { from: 2021, to: 2021 }),
            ..AnalyticsConfig::default()
        };
        assert_eq!(cache.report(&cfg, 1).unwrap().timeline.yearly.len(), 1);
    }

    #[test]
    fn store_and_invalidate_drop_old_report() {
        let mut cache = CatalogCache::new(TTL);
        cache.store(&rows(), 0);
        let cfg = AnalyticsConfig::default();
        assert_eq!(cache.report(&cfg, 0).unwrap().records.len(), 2);

        cache.store(&rows()[..1], 1);
        assert_eq!(cache.report(&cfg, 2).unwrap().records.len(), 1);

        cache.invalidate();
        assert!(cache.records(2).is_none());
        assert!(cache.report(&cfg, 2).is_none());
    }

    #[test]
    fn clock_going_backwards_counts_as_fresh() {
        let mut cache = CatalogCache::new(TTL);
        cache.store(&rows(), 500);
        assert!(cache.records(100).is_some());
    }
}
