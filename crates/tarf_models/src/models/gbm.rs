//! Geometric Brownian motion under the domestic risk-neutral measure.
//!
//! The exchange rate follows
//! ```text
//! dS = (rd(t) - rf(t)) * S * dt + sigma * S * dW
//! ```
//! where `rd` and `rf` are the domestic and foreign short rates implied
//! by the two yield curves. Steps use the exact log-space solution
//! ```text
//! S(t+dt) = S(t) * exp((mu - 0.5*sigma^2)*dt + sigma*sqrt(dt)*dW)
//! ```
//! with `mu` the continuously compounded forward rate differential over
//! the step, so the scheme is bias-free for any step size.

use super::error::ModelError;
use super::stochastic::{SharedCurve, StochasticProcess};

/// Geometric Brownian motion driven by a domestic and a foreign curve.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tarf_core::market_data::FlatCurve;
/// use tarf_models::models::{GbmProcess, StochasticProcess};
///
/// let process = GbmProcess::new(
///     1.10,
///     0.20,
///     Arc::new(FlatCurve::new(0.05_f64)),
///     Arc::new(FlatCurve::new(0.01_f64)),
/// ).unwrap();
///
/// // A zero draw advances the state along the deterministic drift
/// let x1 = process.evolve(0.0, 1.10, 1.0, 0.0).unwrap();
/// let expected = 1.10 * ((0.05 - 0.01 - 0.5 * 0.20_f64 * 0.20) * 1.0).exp();
/// assert!((x1 - expected).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct GbmProcess {
    spot: f64,
    volatility: f64,
    domestic: SharedCurve,
    foreign: SharedCurve,
}

impl GbmProcess {
    /// Constructs the process after validating spot and volatility.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidSpot` - spot not positive/finite
    /// * `ModelError::InvalidVolatility` - volatility negative or non-finite
    pub fn new(
        spot: f64,
        volatility: f64,
        domestic: SharedCurve,
        foreign: SharedCurve,
    ) -> Result<Self, ModelError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(ModelError::InvalidSpot { spot });
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(ModelError::InvalidVolatility { volatility });
        }
        Ok(Self {
            spot,
            volatility,
            domestic,
            foreign,
        })
    }

    /// The initial exchange rate.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// The lognormal volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// The domestic discounting curve.
    #[inline]
    pub fn domestic_curve(&self) -> &SharedCurve {
        &self.domestic
    }

    /// The foreign curve entering the drift.
    #[inline]
    pub fn foreign_curve(&self) -> &SharedCurve {
        &self.foreign
    }
}

impl std::fmt::Debug for GbmProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GbmProcess")
            .field("spot", &self.spot)
            .field("volatility", &self.volatility)
            .finish_non_exhaustive()
    }
}

impl StochasticProcess for GbmProcess {
    fn initial_value(&self) -> f64 {
        self.spot
    }

    fn evolve(&self, t0: f64, x0: f64, dt: f64, dw: f64) -> Result<f64, ModelError> {
        let mu = self.domestic.forward_rate(t0, t0 + dt)? - self.foreign.forward_rate(t0, t0 + dt)?;
        let drift = (mu - 0.5 * self.volatility * self.volatility) * dt;
        let diffusion = self.volatility * dt.sqrt() * dw;
        Ok(x0 * (drift + diffusion).exp())
    }

    fn name(&self) -> &'static str {
        "GBM"
    }
}
