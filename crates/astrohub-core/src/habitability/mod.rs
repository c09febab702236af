//! Weighted multi-factor habitability scoring.
//!
//! Each factor maps one raw record value onto a 0-100 sub-score. Factors
//! whose input is missing are left out, and the remaining weights are
//! rescaled to sum to one, so a record is scored on whatever it does have.
//! A flare-active host then scales the result down by up to
//! `max_flare_penalty`, and the hard physical limits can force it to zero.
//! A record with no evaluable factor gets no score and the `Unknown` label.

pub mod esi;
pub mod zone;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::PlanetRecord;
use esi::earth_similarity;
use zone::HabitableZone;

// ── Factors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Temperature,
    OrbitalZone,
    Radius,
    Mass,
    Insolation,
    Atmosphere,
    Water,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Temperature,
        Factor::OrbitalZone,
        Factor::Radius,
        Factor::Mass,
        Factor::Insolation,
        Factor::Atmosphere,
        Factor::Water,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Temperature => "temperature",
            Factor::OrbitalZone => "orbitalZone",
            Factor::Radius => "radius",
            Factor::Mass => "mass",
            Factor::Insolation => "insolation",
            Factor::Atmosphere => "atmosphere",
            Factor::Water => "water",
        }
    }
}

/// Trapezoidal response curve: 100 across the ideal band, falling linearly
/// to 0 at `zero_below` / `zero_above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub zero_below: f64,
    pub zero_above: f64,
}

impl Band {
    pub const fn new(ideal_min: f64, ideal_max: f64, zero_below: f64, zero_above: f64) -> Self {
        Self { ideal_min, ideal_max, zero_below, zero_above }
    }

    pub fn score(&self, v: f64) -> f64 {
        let s = if v >= self.ideal_min && v <= self.ideal_max {
            100.0
        } else if v < self.ideal_min {
            if v <= self.zero_below {
                0.0
            } else {
                (v - self.zero_below) / (self.ideal_min - self.zero_below) * 100.0
            }
        } else if v >= self.zero_above {
            0.0
        } else {
            (self.zero_above - v) / (self.zero_above - self.ideal_max) * 100.0
        };
        s.clamp(0.0, 100.0)
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Relative factor weights. Only their ratios matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactorWeights {
    pub temperature: f64,
    pub orbital_zone: f64,
    pub radius: f64,
    pub mass: f64,
    pub insolation: f64,
    pub atmosphere: f64,
    pub water: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            orbital_zone: 25.0,
            radius: 15.0,
            mass: 15.0,
            insolation: 10.0,
            atmosphere: 5.0,
            water: 5.0,
        }
    }
}

impl FactorWeights {
    /// Negative weights count as zero.
    pub fn get(&self, factor: Factor) -> f64 {
        let w = match factor {
            Factor::Temperature => self.temperature,
            Factor::OrbitalZone => self.orbital_zone,
            Factor::Radius => self.radius,
            Factor::Mass => self.mass,
            Factor::Insolation => self.insolation,
            Factor::Atmosphere => self.atmosphere,
            Factor::Water => self.water,
        };
        if w.is_finite() { w.max(0.0) } else { 0.0 }
    }
}

/// Host star assumed when a record lacks luminosity or temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceHost {
    /// Solar units.
    pub luminosity: f64,
    /// Kelvin.
    pub temperature: f64,
}

impl ReferenceHost {
    pub const SUN: Self = Self { luminosity: 1.0, temperature: zone::SOLAR_TEFF_K };
}

/// Outside these limits a planet scores 0 regardless of other factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardLimits {
    /// Kelvin, inclusive.
    pub temperature: (f64, f64),
    /// Earth radii, inclusive.
    pub radius: (f64, f64),
}

impl Default for HardLimits {
    fn default() -> Self {
        Self { temperature: (150.0, 500.0), radius: (0.3, 3.0) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScorerConfig {
    pub weights: FactorWeights,
    pub temperature: Band,
    pub radius: Band,
    pub mass: Band,
    pub insolation: Band,
    /// Largest fractional reduction for a fully flare-active host.
    pub max_flare_penalty: f64,
    /// `None` skips the orbital-zone factor when stellar data is missing.
    pub reference_host: Option<ReferenceHost>,
    pub hard_limits: Option<HardLimits>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            temperature: Band::new(250.0, 320.0, 150.0, 500.0),
            radius: Band::new(0.8, 1.8, 0.5, 2.5),
            mass: Band::new(0.8, 5.0, 0.5, 10.0),
            insolation: Band::new(0.35, 1.7, 0.2, 2.5),
            max_flare_penalty: 0.15,
            reference_host: Some(ReferenceHost::SUN),
            hard_limits: Some(HardLimits::default()),
        }
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitabilityLabel {
    #[serde(rename = "Highly Habitable")]
    HighlyHabitable,
    #[serde(rename = "Potentially Habitable")]
    PotentiallyHabitable,
    #[serde(rename = "Marginally Habitable")]
    MarginallyHabitable,
    #[serde(rename = "Non-Habitable")]
    NonHabitable,
    Unknown,
}

impl HabitabilityLabel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Self::Unknown,
            Some(s) if s >= 80.0 => Self::HighlyHabitable,
            Some(s) if s >= 50.0 => Self::PotentiallyHabitable,
            Some(s) if s > 0.0 => Self::MarginallyHabitable,
            Some(_) => Self::NonHabitable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighlyHabitable => "Highly Habitable",
            Self::PotentiallyHabitable => "Potentially Habitable",
            Self::MarginallyHabitable => "Marginally Habitable",
            Self::NonHabitable => "Non-Habitable",
            Self::Unknown => "Unknown",
        }
    }
}

/// One evaluated factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    /// Raw input the factor was computed from.
    pub value: f64,
    pub score100: f64,
    /// Effective weight after renormalization; sums to 1 over the breakdown.
    pub weight: f64,
    /// `score100 × weight`; sums to the pre-penalty score.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habitability {
    /// 0-100, `None` when no factor could be evaluated.
    pub score: Option<f64>,
    pub label: HabitabilityLabel,
    pub breakdown: BTreeMap<Factor, FactorScore>,
    /// Points removed by the stellar activity penalty.
    pub penalty: Option<f64>,
    /// Hard limit that forced the score to zero.
    pub exclusion: Option<String>,
    pub habitable_zone: Option<HabitableZone>,
    /// Earth Similarity Index, 0-100.
    pub esi: Option<f64>,
}

// ── Scoring ───────────────────────────────────────────────────────────────────

fn habitable_zone(record: &PlanetRecord, cfg: &ScorerConfig) -> Option<HabitableZone> {
    let (lum, teff) = match (record.star_luminosity, record.star_temp, cfg.reference_host) {
        (Some(l), Some(t), _) => (l, t),
        (l, t, Some(host)) => (l.unwrap_or(host.luminosity), t.unwrap_or(host.temperature)),
        _ => return None,
    };
    HabitableZone::kopparapu(lum, teff)
}

/// Raw value and 0-100 sub-score for every factor with usable input.
fn evaluate_factors(
    record: &PlanetRecord,
    cfg: &ScorerConfig,
    hz: Option<&HabitableZone>,
) -> Vec<(Factor, f64, f64)> {
    let mut out = Vec::with_capacity(Factor::ALL.len());
    if let Some(t) = record.temperature {
        out.push((Factor::Temperature, t, cfg.temperature.score(t)));
    }
    if let (Some(a), Some(hz)) = (record.semi_major_axis, hz) {
        out.push((Factor::OrbitalZone, a, hz.position_score(a)));
    }
    if let Some(r) = record.radius {
        out.push((Factor::Radius, r, cfg.radius.score(r)));
    }
    if let Some(m) = record.mass {
        out.push((Factor::Mass, m, cfg.mass.score(m)));
    }
    if let Some(s) = record.insolation {
        out.push((Factor::Insolation, s, cfg.insolation.score(s)));
    }
    if let Some(atm) = record.atmosphere {
        let v = if atm { 1.0 } else { 0.0 };
        out.push((Factor::Atmosphere, v, v * 100.0));
    }
    if let Some(w) = record.water_presence {
        out.push((Factor::Water, w, w * 100.0));
    }
    out
}

fn hard_limit_violation(record: &PlanetRecord, limits: &HardLimits) -> Option<String> {
    let outside = |v: f64, (lo, hi): (f64, f64)| v < lo || v > hi;
    if let Some(t) = record.temperature.filter(|t| outside(*t, limits.temperature)) {
        return Some(format!(
            "temperature {t} K outside [{}, {}] K",
            limits.temperature.0, limits.temperature.1
        ));
    }
    if let Some(r) = record.radius.filter(|r| outside(*r, limits.radius)) {
        return Some(format!(
            "radius {r} R⊕ outside [{}, {}] R⊕",
            limits.radius.0, limits.radius.1
        ));
    }
    None
}

/// Score one record without modifying it.
pub fn evaluate(record: &PlanetRecord, cfg: &ScorerConfig) -> Habitability {
    let hz = habitable_zone(record, cfg);
    let factors = evaluate_factors(record, cfg, hz.as_ref());
    let esi = earth_similarity(record).map(|e| e.esi);

    let total_weight: f64 = factors.iter().map(|(f, _, _)| cfg.weights.get(*f)).sum();
    if factors.is_empty() || total_weight <= 0.0 {
        return Habitability {
            score: None,
            label: HabitabilityLabel::Unknown,
            breakdown: BTreeMap::new(),
            penalty: None,
            exclusion: None,
            habitable_zone: hz,
            esi,
        };
    }

    let breakdown: BTreeMap<Factor, FactorScore> = factors
        .into_iter()
        .map(|(factor, value, score100)| {
            let weight = cfg.weights.get(factor) / total_weight;
            (factor, FactorScore { value, score100, weight, contribution: score100 * weight })
        })
        .collect();
    let weighted: f64 = breakdown.values().map(|f| f.contribution).sum();

    let mut score = weighted;
    let mut penalty = None;
    if let Some(flare) = record.flare_activity.filter(|f| *f > 0.0) {
        let scale = (1.0 - cfg.max_flare_penalty.clamp(0.0, 1.0) * flare).clamp(0.0, 1.0);
        score = weighted * scale;
        penalty = Some(weighted - score);
    }

    let exclusion = cfg.hard_limits.as_ref().and_then(|l| hard_limit_violation(record, l));
    if exclusion.is_some() {
        score = 0.0;
    }

    let score = score.clamp(0.0, 100.0);
    Habitability {
        score: Some(score),
        label: HabitabilityLabel::from_score(Some(score)),
        breakdown,
        penalty,
        exclusion,
        habitable_zone: hz,
        esi,
    }
}

/// Compute and attach the habitability of one record.
pub fn score_record(record: &mut PlanetRecord, cfg: &ScorerConfig) {
    record.habitability = Some(evaluate(record, cfg));
}

/// Score a whole record set in place.
#[cfg(not(feature = "threading"))]
pub fn score_all(records: &mut [PlanetRecord], cfg: &ScorerConfig) {
    for record in records.iter_mut() {
        score_record(record, cfg);
    }
}

/// Score a whole record set in place.
#[cfg(feature = "threading")]
pub fn score_all(records: &mut [PlanetRecord], cfg: &ScorerConfig) {
    use rayon::prelude::*;
    records.par_iter_mut().for_each(|record| score_record(record, cfg));
}
