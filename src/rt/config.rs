//! Named parameters for the estimation pipeline.

use ndarray::Array1;

/// All tunable constants of the Rt pipeline.
///
/// Defaults reproduce the reference parameterization: serial interval of 7
/// days, an Rt grid of 1201 points on [0, 12], a Gaussian random walk with
/// sigma 0.15, a 7-day Gaussian smoother (std 2), cutoff 1, and 90%
/// credible mass. Tests pass alternate values through [`RtConfig`] rather
/// than patching constants.
#[derive(Debug, Clone)]
pub struct RtConfig {
    /// Inverse of the serial interval.
    pub gamma: f64,
    /// Upper bound of the Rt grid (lower bound is 0).
    pub r_t_max: f64,
    /// Spacing between adjacent grid values.
    pub grid_step: f64,
    /// Standard deviation of the day-to-day Gaussian random walk on Rt.
    pub sigma: f64,
    /// Width of the centered rolling smoother, in days.
    pub smoothing_window: usize,
    /// Standard deviation of the smoother's Gaussian weights.
    pub smoothing_std: f64,
    /// Smoothed-count threshold below which the leading prefix is dropped.
    pub cutoff: u64,
    /// Probability mass of the credible interval.
    pub ci_mass: f64,
}

impl Default for RtConfig {
    fn default() -> Self {
        Self {
            gamma: 1.0 / 7.0,
            r_t_max: 12.0,
            grid_step: 0.01,
            sigma: 0.15,
            smoothing_window: 7,
            smoothing_std: 2.0,
            cutoff: 1,
            ci_mass: 0.9,
        }
    }
}

impl RtConfig {
    /// Number of points on the Rt grid.
    pub fn grid_len(&self) -> usize {
        (self.r_t_max / self.grid_step).round() as usize + 1
    }

    /// The Rt grid itself: `grid_len` evenly spaced values on [0, r_t_max].
    ///
    /// Every distribution in the pipeline is indexed against this grid, so
    /// it is built once per run and shared.
    pub fn grid(&self) -> Array1<f64> {
        Array1::linspace(0.0, self.r_t_max, self.grid_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_dimensions() {
        let cfg = RtConfig::default();
        let grid = cfg.grid();

        assert_eq!(grid.len(), 1201);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1200], 12.0);
        assert!((grid[1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_custom_grid() {
        let cfg = RtConfig {
            r_t_max: 4.0,
            grid_step: 0.5,
            ..RtConfig::default()
        };
        let grid = cfg.grid();

        assert_eq!(grid.len(), 9);
        assert_eq!(grid[8], 4.0);
    }
}
