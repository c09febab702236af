//! Raw catalog object → canonical [`PlanetRecord`].
//!
//! Upstream sources disagree on key names (the NASA archive uses `pl_rade`,
//! the persisted model uses `radius`, the processed CSV uses `radius_earth`).
//! Every canonical field carries an ordered alias list; the first alias that
//! holds a usable value wins. The canonical camelCase key always comes first,
//! so a record that is already canonical normalizes to itself.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::record::PlanetRecord;

// ── Alias table ───────────────────────────────────────────────────────────────

pub const NAME: &[&str] = &["name", "pl_name", "planetName"];
pub const RADIUS: &[&str] = &["radius", "pl_rade", "radiusRe", "radius_earth"];
pub const MASS: &[&str] = &["mass", "pl_bmasse", "massMe", "mass_earth"];
pub const TEMPERATURE: &[&str] =
    &["temperature", "pl_eqt", "pl_teq", "teqK", "temperatureK", "temp_k"];
pub const ORBITAL_PERIOD: &[&str] = &["orbitalPeriod", "pl_orbper", "period", "period_days"];
pub const SEMI_MAJOR_AXIS: &[&str] =
    &["semiMajorAxis", "pl_orbsmax", "orbitalDistance", "semi_major_axis_au", "a"];
pub const ECCENTRICITY: &[&str] = &["eccentricity", "pl_orbeccen"];
pub const STAR_TYPE: &[&str] = &["starType", "st_spectype"];
pub const STAR_TEMP: &[&str] = &["starTemp", "st_teff", "star_temp_k"];
pub const HOST_STAR: &[&str] = &["hostStar", "hostname"];
pub const DISCOVERY_YEAR: &[&str] = &["discoveryYear", "disc_year"];
pub const DISCOVERY_METHOD: &[&str] = &["discoveryMethod", "discoverymethod"];
pub const DISTANCE: &[&str] = &["distance", "sy_dist"];
pub const INSOLATION: &[&str] = &["insolation", "pl_insol", "Sflux"];
/// `st_lum` is log10(L/L☉) in the NASA archive and is converted on read.
pub const STAR_LUMINOSITY: &[&str] = &["starLuminosity", "st_lum"];
pub const DENSITY: &[&str] = &["density", "pl_dens"];
pub const ESCAPE_VELOCITY: &[&str] = &["escapeVelocity"];
pub const FLARE_ACTIVITY: &[&str] = &["flareActivity"];
pub const ATMOSPHERE: &[&str] = &["atmosphere"];
pub const WATER_PRESENCE: &[&str] = &["waterPresence"];

/// Canonical field name → accepted keys, in priority order.
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("name", NAME),
    ("radius", RADIUS),
    ("mass", MASS),
    ("temperature", TEMPERATURE),
    ("orbitalPeriod", ORBITAL_PERIOD),
    ("semiMajorAxis", SEMI_MAJOR_AXIS),
    ("eccentricity", ECCENTRICITY),
    ("starType", STAR_TYPE),
    ("starTemp", STAR_TEMP),
    ("hostStar", HOST_STAR),
    ("discoveryYear", DISCOVERY_YEAR),
    ("discoveryMethod", DISCOVERY_METHOD),
    ("distance", DISTANCE),
    ("insolation", INSOLATION),
    ("starLuminosity", STAR_LUMINOSITY),
    ("density", DENSITY),
    ("escapeVelocity", ESCAPE_VELOCITY),
    ("flareActivity", FLARE_ACTIVITY),
    ("atmosphere", ATMOSPHERE),
    ("waterPresence", WATER_PRESENCE),
];

// ── Value coercion ────────────────────────────────────────────────────────────

fn as_number(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Names also come through as bare catalog numbers.
fn as_name(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        _ => as_text(v),
    }
}

fn as_flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64()? {
            x if x == 0.0 => Some(false),
            x if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_year(v: &Value) -> Option<i32> {
    let y = as_number(v)?;
    if y.fract() != 0.0 || y < i32::MIN as f64 || y > i32::MAX as f64 {
        return None;
    }
    Some(y as i32)
}

fn first<T>(obj: &Map<String, Value>, aliases: &[&str], coerce: impl Fn(&Value) -> Option<T>) -> Option<T> {
    aliases.iter().filter_map(|k| obj.get(*k)).find_map(coerce)
}

fn non_negative(obj: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    first(obj, aliases, |v| as_number(v).filter(|x| *x >= 0.0))
}

fn unit_interval(obj: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    first(obj, aliases, |v| as_number(v).filter(|x| (0.0..=1.0).contains(x)))
}

fn luminosity(obj: &Map<String, Value>) -> Option<f64> {
    let linear = obj.get(STAR_LUMINOSITY[0]).and_then(as_number);
    let from_log = obj.get(STAR_LUMINOSITY[1]).and_then(as_number).map(|x| 10f64.powf(x));
    [linear, from_log]
        .into_iter()
        .flatten()
        .find(|l| *l > 0.0 && l.is_finite())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Coerce one raw object into a canonical record.
///
/// Missing or unusable optional fields become `None`. Fails only when the
/// value is not an object or carries no non-blank name.
pub fn normalize(raw: &Value) -> Result<PlanetRecord> {
    let obj = raw
        .as_object()
        .ok_or_else(|| EngineError::validation("record is not a JSON object"))?;

    let name = first(obj, NAME, as_name)
        .ok_or_else(|| EngineError::validation("missing required field `name` (string or number)"))?;

    Ok(PlanetRecord {
        name,
        radius: non_negative(obj, RADIUS),
        mass: non_negative(obj, MASS),
        temperature: non_negative(obj, TEMPERATURE),
        orbital_period: non_negative(obj, ORBITAL_PERIOD),
        semi_major_axis: non_negative(obj, SEMI_MAJOR_AXIS),
        eccentricity: unit_interval(obj, ECCENTRICITY),
        star_type: first(obj, STAR_TYPE, as_text),
        star_temp: non_negative(obj, STAR_TEMP),
        host_star: first(obj, HOST_STAR, as_text),
        discovery_year: first(obj, DISCOVERY_YEAR, as_year),
        discovery_method: first(obj, DISCOVERY_METHOD, as_text),
        distance: non_negative(obj, DISTANCE),
        insolation: non_negative(obj, INSOLATION),
        star_luminosity: luminosity(obj),
        density: non_negative(obj, DENSITY),
        escape_velocity: non_negative(obj, ESCAPE_VELOCITY),
        flare_activity: unit_interval(obj, FLARE_ACTIVITY),
        atmosphere: first(obj, ATMOSPHERE, as_flag),
        water_presence: unit_interval(obj, WATER_PRESENCE),
        habitability: None,
    })
}

/// A raw record that did not make it into the normalized set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    /// Position in the raw input.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<PlanetRecord>,
    pub rejected: Vec<Rejected>,
}

/// Normalize a whole batch, rejecting bad records one at a time.
///
/// Names are unique within a batch: the first occurrence wins and later
/// duplicates are rejected.
pub fn normalize_batch<'a, I>(raws: I) -> NormalizedBatch
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut batch = NormalizedBatch::default();
    let mut seen = HashSet::new();

    for (index, raw) in raws.into_iter().enumerate() {
        let outcome = normalize(raw).and_then(|rec| {
            if seen.insert(rec.name.clone()) {
                Ok(rec)
            } else {
                Err(EngineError::validation(format!("duplicate name `{}`", rec.name)))
            }
        });
        match outcome {
            Ok(rec) => batch.records.push(rec),
            Err(e) => {
                log::warn!("skipping record #{index}: {e}");
                batch.rejected.push(Rejected { index, reason: e.to_string() });
            }
        }
    }

    log::debug!(
        "normalized {} records, rejected {}",
        batch.records.len(),
        batch.rejected.len()
    );
    batch
}
