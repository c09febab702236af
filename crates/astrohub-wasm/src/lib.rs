//! Browser bindings for the dashboard: one-shot analysis, single-record
//! scoring and a cached catalog whose clock is `Date.now()`.

use astrohub_core::cache::{CacheTtl, CatalogCache};
use astrohub_core::habitability::evaluate;
use astrohub_core::{normalize, AnalyticsConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {what}: {e}"))
}

/// Missing or blank config means dashboard defaults.
fn parse_config(config_json: Option<&str>) -> Result<AnalyticsConfig, String> {
    match config_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => parse_json("config", json),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn parse_records(records_json: &str) -> Result<Vec<Value>, String> {
    match parse_json::<Value>("records", records_json)? {
        Value::Array(rows) => Ok(rows),
        other => Err(format!("Invalid records: expected an array, got {}", kind(&other))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

// ── Exports ───────────────────────────────────────────────────────────────────

/// Run the full analytics pipeline over a JSON array of raw catalog rows.
#[wasm_bindgen]
pub fn analyze(records_json: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let rows = parse_records(records_json).map_err(|e| JsValue::from_str(&e))?;
    let cfg = parse_config(config_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    to_js(&astrohub_core::run(&rows, &cfg))
}

/// Normalize and score one raw record.
#[wasm_bindgen]
pub fn score(record_json: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let raw: Value = parse_json("record", record_json).map_err(|e| JsValue::from_str(&e))?;
    let cfg = parse_config(config_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    let mut record = normalize(&raw).map_err(|e| JsValue::from_str(&e.to_string()))?;
    record.habitability = Some(evaluate(&record, &cfg.scorer));
    to_js(&record)
}

/// Catalog held between dashboard renders.
#[wasm_bindgen]
pub struct Catalog {
    cache: CatalogCache,
    config: AnalyticsConfig,
}

#[wasm_bindgen]
impl Catalog {
    #[wasm_bindgen(constructor)]
    pub fn new(ttl_json: Option<String>, config_json: Option<String>) -> Result<Catalog, JsValue> {
        let ttl: CacheTtl = match ttl_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => parse_json("ttl", json).map_err(|e| JsValue::from_str(&e))?,
            None => CacheTtl::default(),
        };
        let config = parse_config(config_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
        Ok(Catalog { cache: CatalogCache::new(ttl), config })
    }

    /// Replace the cached rows; returns the rejected ones.
    pub fn store(&mut self, records_json: &str) -> Result<JsValue, JsValue> {
        let rows = parse_records(records_json).map_err(|e| JsValue::from_str(&e))?;
        to_js(&self.cache.store(&rows, now_ms()))
    }

    #[wasm_bindgen(js_name = isFresh)]
    pub fn is_fresh(&self) -> bool {
        self.cache.records(now_ms()).is_some()
    }

    /// Cached report, or `null` once the catalog has expired.
    pub fn report(&mut self) -> Result<JsValue, JsValue> {
        match self.cache.report(&self.config, now_ms()) {
            Some(report) => to_js(report),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.config = parse_config(Some(config_json)).map_err(|e| JsValue::from_str(&e))?;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
