//! Descriptive statistics and Pearson correlation over `f64` series.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Root centered sum of squares below which a series counts as constant.
const DEGENERATE_SPREAD: f64 = 1e-12;

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Result<f64> {
    if xs.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn stddev(xs: &[f64]) -> Result<f64> {
    let m = mean(xs)?;
    let var = xs.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    Ok(var.sqrt())
}

pub fn min_max(xs: &[f64]) -> Result<(f64, f64)> {
    if xs.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    let mn = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let mx = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Ok((mn, mx))
}

/// Pearson correlation coefficient.
///
/// r = Σ(x − x̄)(y − ȳ) / √(Σ(x − x̄)² · Σ(y − ȳ)²), computed from centered
/// sums so a large common offset does not swamp the spread.
///
/// Returns 0.0 when either series is constant. The result is clamped to
/// [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(EngineError::LengthMismatch { left: xs.len(), right: ys.len() });
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let num: f64 = xs.iter().zip(ys).map(|(&x, &y)| (x - mx) * (y - my)).sum();
    let vx = xs.iter().map(|&x| (x - mx).powi(2)).sum::<f64>().sqrt();
    let vy = ys.iter().map(|&y| (y - my).powi(2)).sum::<f64>().sqrt();
    if vx < DEGENERATE_SPREAD || vy < DEGENERATE_SPREAD {
        return Ok(0.0);
    }

    let r = num / (vx * vy);
    Ok(if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 })
}

// ── Classification ────────────────────────────────────────────────────────────

/// Qualitative strength of a correlation, from |r|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CorrelationStrength {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    #[serde(rename = "Weak")]
    Weak,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Strong")]
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        let a = r.abs();
        if a >= 0.8 {
            Self::VeryStrong
        } else if a >= 0.6 {
            Self::Strong
        } else if a >= 0.4 {
            Self::Moderate
        } else if a >= 0.2 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// r == 0 counts as positive.
    pub fn of(r: f64) -> Self {
        if r < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Count, mean, population std and range of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `None` for an empty series.
    pub fn of(xs: &[f64]) -> Option<Self> {
        let mean = mean(xs).ok()?;
        let std = stddev(xs).ok()?;
        let (min, max) = min_max(xs).ok()?;
        Some(Self { count: xs.len(), mean, std, min, max })
    }
}

/// Mean of the present values, `None` when there are none.
pub fn mean_of_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    mean(&present).ok()
}
