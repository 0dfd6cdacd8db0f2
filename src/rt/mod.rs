//! Bayesian estimation of the effective reproduction number Rt.
//!
//! The pipeline: smooth the cumulative series into daily incidence
//! ([`preprocess`]), evaluate the Poisson renewal likelihood over a fixed
//! Rt grid ([`likelihood`]), run the sequential posterior filter
//! ([`posterior`]), then extract per-date point estimates and
//! highest-density intervals ([`interval`]). [`RtEstimator`] wires the
//! stages together and assembles the per-date records.

pub mod config;
pub mod error;
pub mod interval;
pub mod likelihood;
pub mod posterior;
pub mod preprocess;

use chrono::NaiveDate;
use ndarray::Array1;
use serde::Serialize;
use tracing::debug;

pub use config::RtConfig;
pub use error::RtError;

use crate::series::CaseSeries;

/// Point estimate and credible interval for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RtRecord {
    pub date: NaiveDate,
    pub most_likely: f64,
    pub low_90: f64,
    pub high_90: f64,
}

/// Full output of one estimation run.
#[derive(Debug, Clone)]
pub struct RtOutcome {
    /// Per-date records, ascending by date.
    pub records: Vec<RtRecord>,
    /// Total log evidence of the observed series under the model.
    pub log_likelihood: f64,
}

impl RtOutcome {
    pub fn latest(&self) -> Option<&RtRecord> {
        self.records.last()
    }
}

/// Runs the full pipeline for a given parameterization.
///
/// The Rt grid is built once at construction and shared by the likelihood,
/// process matrix, and posterior stages.
pub struct RtEstimator {
    config: RtConfig,
    grid: Array1<f64>,
}

impl RtEstimator {
    pub fn new(config: RtConfig) -> Self {
        let grid = config.grid();
        Self { config, grid }
    }

    pub fn config(&self) -> &RtConfig {
        &self.config
    }

    /// Estimates Rt for every usable date of a cumulative case series.
    ///
    /// # Errors
    ///
    /// [`RtError::InsufficientData`] when smoothing and cutoff trimming
    /// leave nothing to work with, [`RtError::ZeroEvidence`] on a
    /// degenerate posterior update.
    pub fn estimate(&self, cases: &CaseSeries) -> Result<RtOutcome, RtError> {
        let prepared = preprocess::prepare_cases(cases, &self.config);
        debug!(
            input_days = cases.len(),
            usable_days = prepared.len(),
            "prepared case series"
        );

        if prepared.is_empty() {
            return Err(RtError::InsufficientData { usable_days: 0 });
        }

        let likelihoods =
            likelihood::likelihood_table(&prepared, &self.grid.view(), self.config.gamma);
        let posteriors = posterior::get_posteriors(
            &prepared,
            &likelihoods,
            &self.grid.view(),
            self.config.sigma,
        )?;

        let records = posteriors
            .dates
            .iter()
            .zip(&posteriors.distributions)
            .map(|(&date, dist)| {
                let bounds = interval::highest_density_interval(
                    &dist.view(),
                    &self.grid.view(),
                    self.config.ci_mass,
                );
                RtRecord {
                    date,
                    most_likely: interval::most_likely(&dist.view(), &self.grid.view()),
                    low_90: bounds.low,
                    high_90: bounds.high,
                }
            })
            .collect();

        Ok(RtOutcome {
            records,
            log_likelihood: posteriors.log_likelihood,
        })
    }
}
