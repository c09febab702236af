//! Earth Similarity Index (Schulze-Makuch et al. 2011).
//!
//! ESI = Π (1 − |x − x⊕| / (x + x⊕))^w over radius, bulk density, escape
//! velocity and surface temperature. Terms without data are left out of the
//! product and reported in `missing`.

use serde::{Deserialize, Serialize};

use crate::record::PlanetRecord;

/// Earth's reference surface temperature in kelvin.
pub const EARTH_TEMP_K: f64 = 288.0;

const W_RADIUS: f64 = 0.57;
const W_DENSITY: f64 = 1.07;
const W_ESCAPE: f64 = 0.70;
const W_TEMPERATURE: f64 = 5.58;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthSimilarity {
    /// 0-100.
    pub esi: f64,
    /// Names of the terms that had no data.
    pub missing: Vec<String>,
}

/// Values are relative to Earth, so the Earth reference is 1 for every term.
fn term(x: f64, weight: f64) -> f64 {
    if x + 1.0 == 0.0 {
        return 0.0;
    }
    (1.0 - (x - 1.0).abs() / (x + 1.0)).max(0.0).powf(weight)
}

/// `None` when none of the four terms has data.
pub fn earth_similarity(record: &PlanetRecord) -> Option<EarthSimilarity> {
    let terms = [
        ("radius", record.radius, W_RADIUS),
        ("density", record.density, W_DENSITY),
        ("escapeVelocity", record.escape_velocity, W_ESCAPE),
        ("temperature", record.temperature.map(|t| t / EARTH_TEMP_K), W_TEMPERATURE),
    ];

    let mut product = 1.0;
    let mut present = 0usize;
    let mut missing = Vec::new();
    for (name, value, weight) in terms {
        match value {
            Some(x) => {
                product *= term(x, weight);
                present += 1;
            }
            None => missing.push(name.to_string()),
        }
    }

    (present > 0).then(|| EarthSimilarity {
        esi: (product * 100.0).clamp(0.0, 100.0),
        missing,
    })
}
