use thiserror::Error;

/// Errors raised by the analytics engine.
///
/// Only [`EngineError::Validation`] ever reaches a caller of the pipeline, and
/// then only as a per-record rejection; the statistics variants are resolved
/// to sentinels by every builder before they can escape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A raw record could not be turned into a [`crate::PlanetRecord`].
    #[error("invalid record: {reason}")]
    Validation { reason: String },

    /// A statistics primitive was handed an empty series.
    #[error("statistic is undefined for an empty series")]
    EmptyInput,

    /// Paired series passed to a two-sample statistic differ in length.
    #[error("paired series differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}

impl EngineError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
