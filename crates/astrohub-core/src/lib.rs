//! Analytics engine behind the AstroHub exoplanet dashboard.
//!
//! Raw catalog records go through [`normalize`], get a habitability score
//! from [`habitability`], and are then folded into display-ready datasets:
//! binned distributions, a correlation matrix, a discovery timeline and
//! per-category counts. [`pipeline::run`] wires the stages together.

pub mod binning;
pub mod cache;
pub mod categories;
pub mod correlation;
pub mod error;
pub mod habitability;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod temporal;

pub use error::{EngineError, Result};
pub use habitability::{score_record, Habitability, HabitabilityLabel, ScorerConfig};
pub use normalize::{normalize, normalize_batch, NormalizedBatch};
pub use pipeline::{run, AnalyticsConfig, AnalyticsReport};
pub use record::{Field, PlanetRecord};
