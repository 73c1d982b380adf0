//! Simulation time grid.
//!
//! The grid always passes through every mandatory time (the open fixing
//! times) exactly, refining each interval with evenly spaced sub-steps
//! so that no step much exceeds `horizon / steps`.

use super::error::ConfigurationError;

/// Discrete time grid from the valuation date (t = 0) to the horizon.
///
/// Mandatory times are stored bit-exactly, so looking a fixing up by
/// index never lands on a neighbouring step.
///
/// # Examples
///
/// ```rust
/// use tarf_pricing::mc::TimeGrid;
///
/// let grid = TimeGrid::new(&[0.5, 1.0], 8).unwrap();
/// assert_eq!(grid.steps(), 8);
/// assert_eq!(grid.horizon(), 1.0);
/// assert_eq!(grid.mandatory_indices(), &[4, 8]);
/// assert_eq!(grid.time(4), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
    mandatory_indices: Vec<usize>,
}

impl TimeGrid {
    /// Builds a grid through `mandatory_times` with roughly `steps`
    /// equal steps overall.
    ///
    /// Each interval between consecutive mandatory times receives
    /// `round(span / dt_max)` sub-steps (at least one), where `dt_max`
    /// is `horizon / steps`. The realised step count can therefore
    /// differ slightly from `steps` when mandatory times are unevenly
    /// spaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] if
    /// `mandatory_times` is empty, contains a non-finite or
    /// non-positive value, or is not strictly increasing, or if `steps`
    /// is zero.
    pub fn new(mandatory_times: &[f64], steps: usize) -> Result<Self, ConfigurationError> {
        if mandatory_times.is_empty() {
            return Err(ConfigurationError::InvalidParameter {
                name: "mandatory_times",
                value: "empty".to_string(),
            });
        }
        for &t in mandatory_times {
            if !t.is_finite() || t <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    name: "mandatory_times",
                    value: t.to_string(),
                });
            }
        }
        if mandatory_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigurationError::InvalidParameter {
                name: "mandatory_times",
                value: "not strictly increasing".to_string(),
            });
        }
        if steps == 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "steps",
                value: "0".to_string(),
            });
        }

        let horizon = mandatory_times[mandatory_times.len() - 1];
        let dt_max = horizon / steps as f64;

        let mut times = Vec::with_capacity(steps + mandatory_times.len() + 1);
        times.push(0.0);
        let mut previous = 0.0;
        for &t in mandatory_times {
            let span = t - previous;
            let substeps = ((span / dt_max).round() as usize).max(1);
            let dt = span / substeps as f64;
            for k in 1..substeps {
                times.push(previous + k as f64 * dt);
            }
            // The mandatory time itself enters bit-exactly
            times.push(t);
            previous = t;
        }

        let mut grid = Self {
            times,
            mandatory_indices: Vec::with_capacity(mandatory_times.len()),
        };
        for &t in mandatory_times {
            let index = grid.closest_index(t);
            grid.mandatory_indices.push(index);
        }
        Ok(grid)
    }

    /// Number of steps (one less than the number of grid points).
    #[inline]
    pub fn steps(&self) -> usize {
        self.times.len() - 1
    }

    /// All grid points, starting at 0.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The grid point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Step width between points `index` and `index + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `index + 1` is out of range.
    #[inline]
    pub fn dt(&self, index: usize) -> f64 {
        self.times[index + 1] - self.times[index]
    }

    /// The last grid point.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Grid indices of the mandatory times, in input order.
    #[inline]
    pub fn mandatory_indices(&self) -> &[usize] {
        &self.mandatory_indices
    }

    /// Index of the grid point closest to `t`; ties resolve downwards.
    pub fn closest_index(&self, t: f64) -> usize {
        let upper = self.times.partition_point(|&x| x < t);
        if upper == 0 {
            return 0;
        }
        if upper == self.times.len() {
            return self.times.len() - 1;
        }
        if t - self.times[upper - 1] <= self.times[upper] - t {
            upper - 1
        } else {
            upper
        }
    }
}
