//! Poisson renewal likelihood over the Rt grid.
//!
//! For consecutive smoothed counts (previous, current) the model is
//! `current ~ Poisson(previous * exp(gamma * (Rt - 1)))`: tomorrow's
//! expectation is today's count scaled by the growth rate Rt implies. One
//! likelihood column per date, excluding the first date (nothing to
//! condition on).

use chrono::NaiveDate;
use ndarray::{Array1, ArrayView1};
use statrs::function::gamma::ln_gamma;

use crate::rt::preprocess::PreparedSeries;

/// Per-date likelihood columns, indexed against the shared Rt grid.
///
/// Columns hold raw Poisson pmf values; they are not normalized here.
#[derive(Debug, Clone)]
pub struct LikelihoodTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Array1<f64>>,
}

impl LikelihoodTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Builds the likelihood table for a prepared series.
///
/// A series with fewer than two entries has no day-pairs and produces an
/// empty table.
pub fn likelihood_table(
    prepared: &PreparedSeries,
    grid: &ArrayView1<f64>,
    gamma: f64,
) -> LikelihoodTable {
    let mut dates = Vec::new();
    let mut columns = Vec::new();

    for (pair, &date) in prepared
        .smoothed
        .windows(2)
        .zip(prepared.dates.iter().skip(1))
    {
        let (previous, current) = (pair[0], pair[1]);

        let column = grid.mapv(|r| {
            let lambda = previous as f64 * (gamma * (r - 1.0)).exp();
            poisson_pmf(current, lambda)
        });

        dates.push(date);
        columns.push(column);
    }

    LikelihoodTable { dates, columns }
}

/// Poisson pmf via the log-gamma function, numerically stable for large
/// counts.
///
/// A zero (or negative) rate degenerates to a point mass at zero, which is
/// what the renewal model needs when yesterday's count was 0.
pub fn poisson_pmf(k: u64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    (k as f64 * lambda.ln() - lambda - ln_gamma(k as f64 + 1.0)).exp()
}
