//! Sample statistics for the tolerance-driven sampling loop.

/// Accumulator for the simulation estimate.
///
/// Implementations receive one discounted payoff per sample, in sample
/// order, and expose the running mean plus a standard-error estimate
/// once enough samples have arrived.
pub trait Statistics: Send {
    /// Folds one sample into the accumulator.
    fn add_sample(&mut self, value: f64);

    /// Number of samples folded so far.
    fn samples(&self) -> usize;

    /// Running mean; 0 before the first sample.
    fn mean(&self) -> f64;

    /// Standard error of the mean, or `None` with fewer than two
    /// samples.
    fn error_estimate(&self) -> Option<f64>;

    /// Forgets all samples.
    fn reset(&mut self);
}

/// Single-pass mean and variance in Welford form.
///
/// Numerically stable regardless of the payoff scale, which matters
/// because discounted notional-sized payoffs can dwarf their variance.
///
/// # Examples
///
/// ```rust
/// use tarf_pricing::mc::{RunningStatistics, Statistics};
///
/// let mut stats = RunningStatistics::new();
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.add_sample(value);
/// }
/// assert_eq!(stats.samples(), 8);
/// assert!((stats.mean() - 5.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RunningStatistics {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStatistics {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbiased sample variance, or `None` with fewer than two samples.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.m2 / (self.count - 1) as f64)
    }
}

impl Statistics for RunningStatistics {
    fn add_sample(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    fn samples(&self) -> usize {
        self.count
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn error_estimate(&self) -> Option<f64> {
        let variance = self.sample_variance()?;
        Some((variance / self.count as f64).sqrt())
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_mean_and_error() {
        let mut stats = RunningStatistics::new();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.add_sample(value);
        }
        assert_eq!(stats.samples(), 8);
        assert_relative_eq!(stats.mean(), 5.0, epsilon = 1e-14);
        assert_relative_eq!(
            stats.sample_variance().unwrap(),
            32.0 / 7.0,
            epsilon = 1e-14
        );
        assert_relative_eq!(
            stats.error_estimate().unwrap(),
            (32.0 / 7.0 / 8.0_f64).sqrt(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_too_few_samples_give_no_error_estimate() {
        let mut stats = RunningStatistics::new();
        assert_eq!(stats.error_estimate(), None);
        stats.add_sample(3.0);
        assert_eq!(stats.mean(), 3.0);
        assert_eq!(stats.error_estimate(), None);
    }

    #[test]
    fn test_constant_samples_have_zero_error() {
        let mut stats = RunningStatistics::new();
        for _ in 0..100 {
            stats.add_sample(1.25);
        }
        assert_relative_eq!(stats.mean(), 1.25, epsilon = 1e-15);
        assert_eq!(stats.error_estimate(), Some(0.0));
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut stats = RunningStatistics::new();
        stats.add_sample(10.0);
        stats.add_sample(20.0);
        stats.reset();
        assert_eq!(stats.samples(), 0);
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.error_estimate(), None);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut stats: Box<dyn Statistics> = Box::new(RunningStatistics::new());
        stats.add_sample(1.0);
        stats.add_sample(3.0);
        assert_eq!(stats.samples(), 2);
        assert_relative_eq!(stats.mean(), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_large_offset_stability() {
        // Welford keeps precision when the mean dwarfs the spread
        let offset = 1.0e9;
        let mut stats = RunningStatistics::new();
        for value in [offset + 1.0, offset + 2.0, offset + 3.0] {
            stats.add_sample(value);
        }
        assert_relative_eq!(stats.mean(), offset + 2.0, max_relative = 1e-12);
        assert_relative_eq!(stats.sample_variance().unwrap(), 1.0, epsilon = 1e-6);
    }
}
