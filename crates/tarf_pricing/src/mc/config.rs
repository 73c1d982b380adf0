//! Monte Carlo engine configuration.
//!
//! [`McEngineConfig`] collects the simulation controls; [`ProxySettings`]
//! collects the proxy-surface tuning knobs. Both are plain structs with
//! a [`Default`] that matches production use, so call sites override only
//! what they need via struct-update syntax.

use super::error::ConfigurationError;

/// Default seed for reproducible runs.
pub const DEFAULT_SEED: u64 = 42;

/// Tuning knobs for proxy-surface construction.
///
/// The defaults reproduce the behaviour the surface was designed around;
/// change them only with a concrete data problem in hand.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxySettings {
    /// Number of accumulated-amount buckets per fixing. Default: 5.
    pub accumulation_buckets: usize,

    /// Density factor `D`: a merged bucket group is dense enough once
    /// `D x group_size >= total_points_for_fixing`. Default: 10.
    pub density_factor: usize,

    /// Starting cutoff fraction of the spot range for the segment split
    /// (calls; puts use its complement). Default: 0.80.
    pub relative_cutoff: f64,

    /// Minimum fraction of points the critical segment must retain
    /// before the cutoff stops shrinking. Default: 0.33.
    pub min_cutoff_ratio: f64,

    /// Multiplicative shrink applied to the cutoff fraction per
    /// starved-segment iteration. Default: 0.99.
    pub cutoff_shrink_factor: f64,

    /// Percentile of the sorted spots where quadratic evaluation gives
    /// way to linear extrapolation on the far-from-the-money side.
    /// Default: 0.05.
    pub lower_extrapolation_percentile: f64,

    /// Percentile trim defining the statistically trustworthy core spot
    /// region reported on each proxy function. Default: 0.01.
    pub core_percentile: f64,

    /// Minimum observations per regression segment. Default: 3.
    pub min_regression_points: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            accumulation_buckets: 5,
            density_factor: 10,
            relative_cutoff: 0.80,
            min_cutoff_ratio: 0.33,
            cutoff_shrink_factor: 0.99,
            lower_extrapolation_percentile: 0.05,
            core_percentile: 0.01,
            min_regression_points: 3,
        }
    }
}

impl ProxySettings {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] if:
    /// - `accumulation_buckets` or `density_factor` is zero
    /// - `relative_cutoff` is outside (0.5, 1)
    /// - `min_cutoff_ratio` or `cutoff_shrink_factor` is outside (0, 1)
    /// - either percentile is outside (0, 0.5)
    /// - `min_regression_points` is below 3
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.accumulation_buckets == 0 {
            return Err(invalid("accumulation_buckets", &self.accumulation_buckets));
        }
        if self.density_factor == 0 {
            return Err(invalid("density_factor", &self.density_factor));
        }
        if !(self.relative_cutoff > 0.5 && self.relative_cutoff < 1.0) {
            return Err(invalid("relative_cutoff", &self.relative_cutoff));
        }
        if !(self.min_cutoff_ratio > 0.0 && self.min_cutoff_ratio < 1.0) {
            return Err(invalid("min_cutoff_ratio", &self.min_cutoff_ratio));
        }
        if !(self.cutoff_shrink_factor > 0.0 && self.cutoff_shrink_factor < 1.0) {
            return Err(invalid("cutoff_shrink_factor", &self.cutoff_shrink_factor));
        }
        if !(self.lower_extrapolation_percentile > 0.0
            && self.lower_extrapolation_percentile < 0.5)
        {
            return Err(invalid(
                "lower_extrapolation_percentile",
                &self.lower_extrapolation_percentile,
            ));
        }
        if !(self.core_percentile > 0.0 && self.core_percentile < 0.5) {
            return Err(invalid("core_percentile", &self.core_percentile));
        }
        // A quadratic has three coefficients
        if self.min_regression_points < 3 {
            return Err(invalid("min_regression_points", &self.min_regression_points));
        }
        Ok(())
    }
}

/// Monte Carlo engine configuration.
///
/// The time grid is fixed by exactly one of `steps` (total) or
/// `steps_per_year`; the stopping rule by exactly one of `samples`
/// (fixed count) or `tolerance` (target standard error). [`validate`]
/// rejects anything else.
///
/// # Examples
///
/// ```rust
/// use tarf_pricing::mc::McEngineConfig;
///
/// let config = McEngineConfig {
///     steps: Some(8),
///     samples: Some(10_000),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, 42);
/// assert!(config.generate_proxy);
/// ```
///
/// [`validate`]: McEngineConfig::validate
#[derive(Clone, Debug, PartialEq)]
pub struct McEngineConfig {
    /// Total number of time steps over the simulation horizon.
    pub steps: Option<usize>,

    /// Time steps per year; the total is derived from the horizon.
    pub steps_per_year: Option<usize>,

    /// Fixed number of samples to draw.
    pub samples: Option<usize>,

    /// Target standard error; sampling continues in waves until met.
    /// Requires a random source with an error estimate.
    pub tolerance: Option<f64>,

    /// Cap on samples in tolerance mode. `None` means unbounded.
    pub max_samples: Option<usize>,

    /// Seed for the random source sub-streams.
    pub seed: u64,

    /// Draw each path together with its antithetic mirror.
    pub antithetic: bool,

    /// Build paths with a Brownian bridge instead of incremental steps.
    pub brownian_bridge: bool,

    /// Record observations and build the proxy surface.
    pub generate_proxy: bool,

    /// Proxy-surface tuning knobs.
    pub proxy: ProxySettings,
}

impl Default for McEngineConfig {
    fn default() -> Self {
        Self {
            steps: None,
            steps_per_year: None,
            samples: None,
            tolerance: None,
            max_samples: None,
            seed: DEFAULT_SEED,
            antithetic: false,
            brownian_bridge: false,
            generate_proxy: true,
            proxy: ProxySettings::default(),
        }
    }
}

impl McEngineConfig {
    /// Validates the configuration.
    ///
    /// Tolerance support of the random source is checked at engine
    /// construction, where the source is known.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::StepsSpecification`] unless exactly
    /// one of `steps` and `steps_per_year` is set, and
    /// [`ConfigurationError::SamplesSpecification`] unless exactly one
    /// of `samples` and `tolerance` is set. Zero counts, non-finite or
    /// non-positive tolerances, and invalid [`ProxySettings`] yield
    /// [`ConfigurationError::InvalidParameter`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.steps.is_some() == self.steps_per_year.is_some() {
            return Err(ConfigurationError::StepsSpecification);
        }
        if self.samples.is_some() == self.tolerance.is_some() {
            return Err(ConfigurationError::SamplesSpecification);
        }
        if let Some(steps) = self.steps {
            if steps == 0 {
                return Err(invalid("steps", &steps));
            }
        }
        if let Some(steps_per_year) = self.steps_per_year {
            if steps_per_year == 0 {
                return Err(invalid("steps_per_year", &steps_per_year));
            }
        }
        if let Some(samples) = self.samples {
            if samples == 0 {
                return Err(invalid("samples", &samples));
            }
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(invalid("tolerance", &tolerance));
            }
        }
        if let Some(max_samples) = self.max_samples {
            if max_samples == 0 {
                return Err(invalid("max_samples", &max_samples));
            }
        }
        self.proxy.validate()
    }
}

fn invalid(name: &'static str, value: &dyn std::fmt::Display) -> ConfigurationError {
    ConfigurationError::InvalidParameter {
        name,
        value: value.to_string(),
    }
}
