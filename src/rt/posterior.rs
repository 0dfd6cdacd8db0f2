//! Sequential Bayesian filter over the Rt grid.
//!
//! A discrete-state forward pass: the state is a position on the Rt grid,
//! the transition is a Gaussian random walk (the process matrix), and the
//! emission is the Poisson renewal likelihood. Each day the previous
//! posterior is diffused through the process matrix, multiplied pointwise
//! by the day's likelihood, and renormalized; the log of each day's
//! normalizer accumulates into the total model evidence.

use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1};
use statrs::distribution::{Continuous, Normal};

use crate::rt::error::RtError;
use crate::rt::likelihood::LikelihoodTable;
use crate::rt::preprocess::PreparedSeries;

/// One normalized distribution over the Rt grid per date.
#[derive(Debug, Clone)]
pub struct PosteriorTable {
    pub dates: Vec<NaiveDate>,
    pub distributions: Vec<Array1<f64>>,
    /// Running sum of log evidence across the updates. Not consumed by the
    /// result assembly; exposed as a model-comparison diagnostic.
    pub log_likelihood: f64,
}

/// One-step transition matrix for the Gaussian random walk on Rt.
///
/// `matrix[[i, j]]` is the probability of moving from grid value `j` to
/// grid value `i`; each column is normalized to sum to 1 so it is a valid
/// conditional distribution. The matrix is date-independent and built once
/// per run.
pub fn process_matrix(grid: &ArrayView1<f64>, sigma: f64) -> Result<Array2<f64>, RtError> {
    let n = grid.len();
    let mut matrix = Array2::zeros((n, n));

    for (j, &center) in grid.iter().enumerate() {
        let kernel = Normal::new(center, sigma)
            .map_err(|e| RtError::InvalidConfig(format!("process sigma {sigma}: {e}")))?;

        let mut column = matrix.column_mut(j);
        for (i, &r) in grid.iter().enumerate() {
            column[i] = kernel.pdf(r);
        }

        let total = column.sum();
        column.mapv_inplace(|v| v / total);
    }

    Ok(matrix)
}

/// Runs the forward pass and returns the day-by-day posterior table.
///
/// The first in-range date carries the uniform prior; every later date is
/// one diffusion + Bayes update. `likelihoods` must hold exactly one
/// column per date after the first.
///
/// # Errors
///
/// [`RtError::InsufficientData`] if the prepared series is empty, and
/// [`RtError::ZeroEvidence`] if a day's normalizer vanishes (posterior and
/// likelihood supports disjoint after underflow).
pub fn get_posteriors(
    prepared: &PreparedSeries,
    likelihoods: &LikelihoodTable,
    grid: &ArrayView1<f64>,
    sigma: f64,
) -> Result<PosteriorTable, RtError> {
    if prepared.is_empty() {
        return Err(RtError::InsufficientData { usable_days: 0 });
    }

    let n = grid.len();
    let uniform = Array1::from_elem(n, 1.0 / n as f64);

    let mut distributions = Vec::with_capacity(prepared.len());
    distributions.push(uniform);
    let mut log_likelihood = 0.0;

    if prepared.len() > 1 {
        let matrix = process_matrix(grid, sigma)?;

        for (step, column) in likelihoods.columns.iter().enumerate() {
            let current_prior = matrix.dot(&distributions[step]);
            let numerator = column * &current_prior;
            let denominator = numerator.sum();

            if !(denominator > 0.0) || !denominator.is_finite() {
                return Err(RtError::ZeroEvidence {
                    date: likelihoods.dates[step],
                });
            }

            distributions.push(numerator / denominator);
            log_likelihood += denominator.ln();
        }
    }

    Ok(PosteriorTable {
        dates: prepared.dates.clone(),
        distributions,
        log_likelihood,
    })
}
