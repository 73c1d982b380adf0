//! Interpolated yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Interpolation method for yield curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveInterpolation {
    /// Linear interpolation on zero rates.
    ///
    /// Interpolates the zero rate linearly between pillars, then
    /// computes the discount factor as exp(-r*t).
    LinearZero,

    /// Log-linear interpolation on discount factors.
    ///
    /// Interpolates ln(D(t)) linearly, which is equivalent to a
    /// piecewise-constant instantaneous forward rate.
    LogLinearDiscount,
}

/// Interpolated yield curve built from pillar points.
///
/// Stores (tenor, zero rate) pairs and interpolates between them to
/// compute discount factors for arbitrary maturities. Log discount
/// factors are precomputed at construction so queries only perform a
/// binary search and one linear blend.
///
/// # Example
///
/// ```
/// use tarf_core::market_data::curves::{YieldCurve, InterpolatedCurve, CurveInterpolation};
///
/// let tenors = [0.25, 0.5, 1.0, 2.0, 5.0];
/// let rates = [0.02, 0.025, 0.03, 0.035, 0.04];
///
/// let curve = InterpolatedCurve::new(
///     &tenors,
///     &rates,
///     CurveInterpolation::LinearZero,
///     true,
/// ).unwrap();
///
/// // Interpolate at 0.75 years (between 0.5 and 1.0)
/// let df = curve.discount_factor(0.75).unwrap();
/// assert!(df > 0.0 && df < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve<T: Float> {
    /// Strictly increasing tenor points (years)
    tenors: Vec<T>,
    /// Zero rates at the pillars
    rates: Vec<T>,
    /// Precomputed ln(D(t)) = -r*t at the pillars
    log_dfs: Vec<T>,
    method: CurveInterpolation,
    allow_extrapolation: bool,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Constructs an interpolated curve from pillar points.
    ///
    /// # Arguments
    ///
    /// * `tenors` - Tenor points in years (strictly increasing, positive, at least 2)
    /// * `rates` - Corresponding continuously compounded zero rates
    /// * `method` - Interpolation method
    /// * `allow_extrapolation` - Whether queries beyond the pillars flat-extrapolate
    ///   the boundary rate instead of failing
    ///
    /// # Errors
    ///
    /// * `MarketDataError::InsufficientData` - Fewer than 2 pillars, or length mismatch
    /// * `MarketDataError::InvalidMaturity` - Non-positive tenor
    /// * `MarketDataError::UnsortedTenors` - Tenors not strictly increasing
    pub fn new(
        tenors: &[T],
        rates: &[T],
        method: CurveInterpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if tenors.len() < 2 {
            return Err(MarketDataError::InsufficientData {
                got: tenors.len(),
                need: 2,
            });
        }
        if tenors.len() != rates.len() {
            return Err(MarketDataError::InsufficientData {
                got: rates.len(),
                need: tenors.len(),
            });
        }
        for i in 0..tenors.len() {
            if tenors[i] <= T::zero() {
                return Err(MarketDataError::InvalidMaturity {
                    t: tenors[i].to_f64().unwrap_or(0.0),
                });
            }
            if i > 0 && tenors[i] <= tenors[i - 1] {
                return Err(MarketDataError::UnsortedTenors { index: i });
            }
        }

        let log_dfs = tenors
            .iter()
            .zip(rates.iter())
            .map(|(&t, &r)| -r * t)
            .collect();

        Ok(Self {
            tenors: tenors.to_vec(),
            rates: rates.to_vec(),
            log_dfs,
            method,
            allow_extrapolation,
        })
    }

    /// Returns the pillar domain as (t_min, t_max).
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.tenors[0], self.tenors[self.tenors.len() - 1])
    }

    /// Returns the interpolation method.
    #[inline]
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Returns whether extrapolation is allowed.
    #[inline]
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// Linear blend of `values` at time `t`, assuming `t` lies within the
    /// pillar domain.
    fn blend(&self, values: &[T], t: T) -> T {
        let idx = self.tenors.partition_point(|&x| x < t);
        if idx == 0 {
            return values[0];
        }
        let (t0, t1) = (self.tenors[idx - 1], self.tenors[idx]);
        let (v0, v1) = (values[idx - 1], values[idx]);
        let w = (t - t0) / (t1 - t0);
        v0 + w * (v1 - v0)
    }

    /// Flat extrapolation outside the pillar domain uses the boundary
    /// zero rate for both interpolation methods.
    fn extrapolated_df(&self, t: T) -> Result<T, MarketDataError> {
        let (t_min, t_max) = self.domain();
        if !self.allow_extrapolation {
            return Err(MarketDataError::OutOfBounds {
                x: t.to_f64().unwrap_or(0.0),
                min: t_min.to_f64().unwrap_or(0.0),
                max: t_max.to_f64().unwrap_or(0.0),
            });
        }
        let rate = if t < t_min {
            self.rates[0]
        } else {
            self.rates[self.rates.len() - 1]
        };
        Ok((-rate * t).exp())
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }

        let (t_min, t_max) = self.domain();
        if t < t_min || t > t_max {
            return self.extrapolated_df(t);
        }

        match self.method {
            CurveInterpolation::LinearZero => {
                let rate = self.blend(&self.rates, t);
                Ok((-rate * t).exp())
            }
            CurveInterpolation::LogLinearDiscount => {
                let log_df = self.blend(&self.log_dfs, t);
                Ok(log_df.exp())
            }
        }
    }
}
