//! Highest-density credible intervals and point estimates.
//!
//! Rt posteriors are frequently skewed, so the interval reported is the
//! narrowest one holding the required mass rather than a symmetric
//! quantile pair.

use ndarray::ArrayView1;

/// Grid values bounding the narrowest interval with mass above the
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HdiBounds {
    pub low: f64,
    pub high: f64,
}

/// Narrowest interval `[low, high]` on the grid whose enclosed mass
/// exceeds `p`.
///
/// Mass between indices is measured on the cumulative sum
/// (`cumsum[hi] - cumsum[lo]`). Among equal-width intervals the first in
/// index order wins, so results are reproducible. If no interval reaches
/// `p` (mass pinned to the grid edge), the full grid range is returned.
pub fn highest_density_interval(
    pmf: &ArrayView1<f64>,
    grid: &ArrayView1<f64>,
    p: f64,
) -> HdiBounds {
    let n = pmf.len();
    debug_assert_eq!(n, grid.len());

    let mut cumsum = Vec::with_capacity(n);
    let mut acc = 0.0;
    for &v in pmf {
        acc += v;
        cumsum.push(acc);
    }

    // Sliding window: cumsum is non-decreasing, so the smallest qualifying
    // `hi` never moves backwards as `lo` advances.
    let mut best: Option<(usize, usize)> = None;
    let mut hi = 0;
    for lo in 0..n {
        if hi < lo {
            hi = lo;
        }
        while hi < n && cumsum[hi] - cumsum[lo] <= p {
            hi += 1;
        }
        if hi == n {
            break;
        }
        if best.is_none_or(|(blo, bhi)| hi - lo < bhi - blo) {
            best = Some((lo, hi));
        }
    }

    match best {
        Some((lo, hi)) => HdiBounds {
            low: grid[lo],
            high: grid[hi],
        },
        None => HdiBounds {
            low: grid[0],
            high: grid[n - 1],
        },
    }
}

/// Grid value with the highest posterior probability; first index on ties.
pub fn most_likely(pmf: &ArrayView1<f64>, grid: &ArrayView1<f64>) -> f64 {
    let mut best = 0;
    for i in 1..pmf.len() {
        if pmf[i] > pmf[best] {
            best = i;
        }
    }
    grid[best]
}
