//! Typed failure modes of the estimation core.

use chrono::NaiveDate;
use thiserror::Error;

use crate::series::SeriesError;

#[derive(Debug, Error)]
pub enum RtError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// The smoothed series never reached the cutoff, leaving nothing to
    /// estimate against.
    #[error("insufficient data: {usable_days} usable day(s) after smoothing and cutoff trimming")]
    InsufficientData { usable_days: usize },

    /// The Bayesian evidence for a day collapsed to zero, so the posterior
    /// cannot be normalized. Surfaced rather than patched with an epsilon.
    #[error("zero evidence normalizing the posterior for {date}")]
    ZeroEvidence { date: NaiveDate },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
