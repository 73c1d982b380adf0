//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Generic yield curve trait for discount factor and rate calculations.
///
/// Implementations are generic over `T: Float` so the same curve code
/// serves `f64` production paths and narrower types in tests. An FX
/// pricer typically holds two of these: the domestic curve used for
/// discounting payouts, and the foreign curve entering the drift of the
/// exchange rate process.
///
/// # Contract
///
/// - `discount_factor(t)` returns the discount factor D(t) for maturity t
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t)
/// - `forward_rate(t1, t2)` returns the forward rate between t1 and t2
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use tarf_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// let rate = curve.zero_rate(1.0).unwrap();
/// assert!((rate - 0.05).abs() < 1e-10);
///
/// let fwd = curve.forward_rate(1.0, 2.0).unwrap();
/// assert!((fwd - 0.05).abs() < 1e-10);
/// ```
pub trait YieldCurve<T: Float> {
    /// Returns the discount factor for maturity `t`.
    ///
    /// The discount factor D(t) is the present value of one unit of
    /// currency received at time t.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::InvalidMaturity` if `t < 0`, and
    /// implementation-specific errors for out-of-domain queries.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Returns the continuously compounded zero rate for maturity `t`.
    ///
    /// Default implementation inverts the discount factor:
    ///
    /// ```text
    /// r(t) = -ln(D(t)) / t
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::InvalidMaturity` if `t <= 0`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        let df = self.discount_factor(t)?;
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(-df.ln() / t)
    }

    /// Returns the forward rate between `t1` and `t2`.
    ///
    /// Default implementation uses the ratio of discount factors:
    ///
    /// ```text
    /// f(t1, t2) = -ln(D(t2) / D(t1)) / (t2 - t1)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::InvalidMaturity` if `t2 <= t1`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        Ok(-(df2 / df1).ln() / dt)
    }
}
