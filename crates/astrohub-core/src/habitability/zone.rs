//! Kopparapu et al. (2013) empirical habitable zone.
//!
//! Inner edge: moist greenhouse limit. Outer edge: maximum greenhouse limit.
//! S_eff(T) = S_eff☉ + a·T⋆ + b·T⋆² + c·T⋆³ + d·T⋆⁴ with T⋆ = T_eff − 5780 K,
//! and the edge distance is √(L / S_eff) in AU.

use serde::{Deserialize, Serialize};

/// Solar effective temperature the polynomial is centred on.
pub const SOLAR_TEFF_K: f64 = 5780.0;

/// The fit is calibrated for 2600 K ≤ T_eff ≤ 7200 K; inputs are clamped.
const TEFF_RANGE_K: (f64, f64) = (2600.0, 7200.0);

const MOIST_GREENHOUSE: (f64, [f64; 4]) = (1.014, [8.177e-5, 1.706e-9, -1.814e-12, -1.975e-16]);
const MAX_GREENHOUSE: (f64, [f64; 4]) = (0.343, [5.447e-5, 1.527e-9, -2.170e-12, -3.828e-16]);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitableZone {
    /// AU.
    pub inner: f64,
    /// AU.
    pub outer: f64,
}

fn effective_flux((s_sun, c): (f64, [f64; 4]), t: f64) -> f64 {
    s_sun + c[0] * t + c[1] * t.powi(2) + c[2] * t.powi(3) + c[3] * t.powi(4)
}

impl HabitableZone {
    /// `luminosity` in solar units, `star_temp` in kelvin. `None` for
    /// non-positive inputs.
    pub fn kopparapu(luminosity: f64, star_temp: f64) -> Option<Self> {
        if !(luminosity > 0.0 && star_temp > 0.0) {
            return None;
        }
        let t = star_temp.clamp(TEFF_RANGE_K.0, TEFF_RANGE_K.1) - SOLAR_TEFF_K;
        let s_inner = effective_flux(MOIST_GREENHOUSE, t);
        let s_outer = effective_flux(MAX_GREENHOUSE, t);
        if s_inner <= 0.0 || s_outer <= 0.0 {
            return None;
        }
        Some(Self {
            inner: (luminosity / s_inner).sqrt(),
            outer: (luminosity / s_outer).sqrt(),
        })
    }

    pub fn contains(&self, distance_au: f64) -> bool {
        distance_au >= self.inner && distance_au <= self.outer
    }

    /// 0-100 orbital-position score.
    ///
    /// 100 inside the zone, 0 closer than half the inner edge or farther than
    /// 1.5× the outer edge; in between the score drops by 200 points per AU
    /// of distance to the nearer edge.
    pub fn position_score(&self, distance_au: f64) -> f64 {
        if distance_au < self.inner * 0.5 || distance_au > self.outer * 1.5 {
            return 0.0;
        }
        if self.contains(distance_au) {
            return 100.0;
        }
        let delta = (distance_au - self.inner).abs().min((distance_au - self.outer).abs());
        (100.0 - delta * 200.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn solar_zone_brackets_earth() {
        let hz = HabitableZone::kopparapu(1.0, SOLAR_TEFF_K).unwrap();
        assert_abs_diff_eq!(hz.inner, (1.0f64 / 1.014).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(hz.outer, (1.0f64 / 0.343).sqrt(), epsilon = 1e-12);
        assert!(hz.contains(1.0));
        assert_eq!(hz.position_score(1.0), 100.0);
    }

    #[test]
    fn dim_star_pulls_zone_inward() {
        let sun = HabitableZone::kopparapu(1.0, 5780.0).unwrap();
        let red_dwarf = HabitableZone::kopparapu(0.0005, 2560.0).unwrap();
        assert!(red_dwarf.outer < sun.inner);
        assert!(red_dwarf.inner < 0.05, "inner={}", red_dwarf.inner);
    }

    #[test]
    fn non_positive_inputs_have_no_zone() {
        assert!(HabitableZone::kopparapu(0.0, 5780.0).is_none());
        assert!(HabitableZone::kopparapu(1.0, -1.0).is_none());
        assert!(HabitableZone::kopparapu(f64::NAN, 5780.0).is_none());
    }

    #[test]
    fn position_score_decays_outside_zone() {
        let hz = HabitableZone { inner: 1.0, outer: 2.0 };
        assert_eq!(hz.position_score(0.4), 0.0);
        assert_eq!(hz.position_score(3.1), 0.0);
        assert_abs_diff_eq!(hz.position_score(0.9), 80.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hz.position_score(2.25), 50.0, epsilon = 1e-9);
        assert_eq!(hz.position_score(2.9), 0.0);
    }
}
