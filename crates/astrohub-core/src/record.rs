use serde::{Deserialize, Serialize};

use crate::habitability::Habitability;

/// Parsecs to light years, as used by the dashboard's distance charts.
pub const LIGHT_YEARS_PER_PARSEC: f64 = 3.26;

/// One astronomical body in canonical shape.
///
/// Produced by [`crate::normalize`]; every optional field is `None` when the
/// upstream catalog did not supply a usable value. `habitability` is filled
/// in by the scorer and is never read from raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetRecord {
    pub name: String,

    /// Earth radii.
    pub radius: Option<f64>,
    /// Earth masses.
    pub mass: Option<f64>,
    /// Equilibrium temperature in kelvin.
    pub temperature: Option<f64>,
    /// Days.
    pub orbital_period: Option<f64>,
    /// AU.
    pub semi_major_axis: Option<f64>,
    /// 0-1.
    pub eccentricity: Option<f64>,

    /// Spectral type code, e.g. "G2 V".
    pub star_type: Option<String>,
    /// Host effective temperature in kelvin.
    pub star_temp: Option<f64>,
    pub host_star: Option<String>,

    pub discovery_year: Option<i32>,
    pub discovery_method: Option<String>,
    /// Parsecs.
    pub distance: Option<f64>,

    /// Stellar flux relative to Earth.
    pub insolation: Option<f64>,
    /// Host luminosity in solar units (linear, not log10).
    pub star_luminosity: Option<f64>,
    /// Bulk density relative to Earth.
    pub density: Option<f64>,
    /// Escape velocity relative to Earth.
    pub escape_velocity: Option<f64>,
    /// Host flare activity, 0 = quiet, 1 = strongly flaring.
    pub flare_activity: Option<f64>,
    pub atmosphere: Option<bool>,
    /// Likelihood of liquid water, 0-1.
    pub water_presence: Option<f64>,

    #[serde(default)]
    pub habitability: Option<Habitability>,
}

impl PlanetRecord {
    /// A record with only its identity set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            radius: None,
            mass: None,
            temperature: None,
            orbital_period: None,
            semi_major_axis: None,
            eccentricity: None,
            star_type: None,
            star_temp: None,
            host_star: None,
            discovery_year: None,
            discovery_method: None,
            distance: None,
            insolation: None,
            star_luminosity: None,
            density: None,
            escape_velocity: None,
            flare_activity: None,
            atmosphere: None,
            water_presence: None,
            habitability: None,
        }
    }

    /// Earth as the canonical reference body. The only record expected to
    /// reach a habitability score of exactly 100.
    pub fn earth() -> Self {
        Self {
            radius: Some(1.0),
            mass: Some(1.0),
            temperature: Some(288.0),
            orbital_period: Some(365.25),
            semi_major_axis: Some(1.0),
            eccentricity: Some(0.0167),
            star_type: Some("G2 V".into()),
            star_temp: Some(5772.0),
            host_star: Some("Sun".into()),
            distance: Some(0.0),
            insolation: Some(1.0),
            star_luminosity: Some(1.0),
            density: Some(1.0),
            escape_velocity: Some(1.0),
            flare_activity: Some(0.0),
            atmosphere: Some(true),
            water_presence: Some(1.0),
            ..Self::named("Earth")
        }
    }

    /// Composite habitability score, if the record has been scored and had
    /// enough data for one.
    pub fn score(&self) -> Option<f64> {
        self.habitability.as_ref().and_then(|h| h.score)
    }

    /// Distance converted to light years.
    pub fn distance_ly(&self) -> Option<f64> {
        self.distance.map(|pc| pc * LIGHT_YEARS_PER_PARSEC)
    }
}

/// Numeric record fields that can be binned or aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Radius,
    Mass,
    Temperature,
    OrbitalPeriod,
    SemiMajorAxis,
    Eccentricity,
    StarTemp,
    /// Parsecs, as stored.
    Distance,
    /// Distance converted to light years.
    DistanceLy,
    Insolation,
    Score,
}

impl Field {
    pub fn value(self, record: &PlanetRecord) -> Option<f64> {
        match self {
            Field::Radius => record.radius,
            Field::Mass => record.mass,
            Field::Temperature => record.temperature,
            Field::OrbitalPeriod => record.orbital_period,
            Field::SemiMajorAxis => record.semi_major_axis,
            Field::Eccentricity => record.eccentricity,
            Field::StarTemp => record.star_temp,
            Field::Distance => record.distance,
            Field::DistanceLy => record.distance_ly(),
            Field::Insolation => record.insolation,
            Field::Score => record.score(),
        }
    }
}
