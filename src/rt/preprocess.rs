//! Turns a cumulative series into a smoothed daily-incidence series.
//!
//! Three steps: first-difference the cumulative counts, smooth with a
//! centered Gaussian-weighted rolling window, then drop the leading prefix
//! until the smoothed count first reaches the cutoff. Reported case data is
//! noisy (weekend batching, reporting lags), so the likelihood model only
//! ever sees the smoothed series; the raw daily counts ride along for
//! inspection.

use chrono::NaiveDate;

use crate::rt::config::RtConfig;
use crate::series::CaseSeries;

/// Aligned daily series over the trimmed date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSeries {
    pub dates: Vec<NaiveDate>,
    /// Raw first differences of the cumulative input.
    pub original: Vec<u64>,
    /// Gaussian-smoothed, rounded counts. This is what the likelihood
    /// model consumes.
    pub smoothed: Vec<u64>,
}

impl PreparedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Prepares a cumulative series for likelihood evaluation.
///
/// The output starts one day after the input (a first difference needs two
/// points) and may be empty if the smoothed counts never reach
/// `config.cutoff`.
pub fn prepare_cases(cases: &CaseSeries, config: &RtConfig) -> PreparedSeries {
    let counts = cases.counts();
    let dates = cases.dates();

    if counts.len() < 2 {
        return PreparedSeries {
            dates: Vec::new(),
            original: Vec::new(),
            smoothed: Vec::new(),
        };
    }

    // First difference; validated non-decreasing so this cannot underflow.
    let new_cases: Vec<u64> = counts.windows(2).map(|w| w[1] - w[0]).collect();
    let new_dates: Vec<NaiveDate> = dates[1..].to_vec();

    let smoothed = gaussian_rolling_mean(
        &new_cases,
        config.smoothing_window,
        config.smoothing_std,
    );

    // Trim everything before the smoothed series first reaches the cutoff;
    // near-zero counts make the Poisson likelihood ill-conditioned.
    let start = match smoothed.iter().position(|&v| v >= config.cutoff) {
        Some(idx) => idx,
        None => new_cases.len(),
    };

    PreparedSeries {
        dates: new_dates[start..].to_vec(),
        original: new_cases[start..].to_vec(),
        smoothed: smoothed[start..].to_vec(),
    }
}

/// Centered rolling weighted mean with Gaussian weights, rounded to the
/// nearest integer.
///
/// Partial windows at the edges are averaged over just the in-range points
/// (weights renormalized), so every input position produces an output.
fn gaussian_rolling_mean(values: &[u64], window: usize, std: f64) -> Vec<u64> {
    let n = values.len();
    let center = (window.saturating_sub(1)) / 2;

    let weights: Vec<f64> = (0..window)
        .map(|k| {
            let z = (k as f64 - center as f64) / std;
            (-0.5 * z * z).exp()
        })
        .collect();

    (0..n)
        .map(|i| {
            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for (k, &w) in weights.iter().enumerate() {
                let offset = i as i64 + k as i64 - center as i64;
                if offset < 0 || offset >= n as i64 {
                    continue;
                }
                numerator += w * values[offset as usize] as f64;
                denominator += w;
            }
            (numerator / denominator).round() as u64
        })
        .collect()
}
