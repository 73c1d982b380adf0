//! The stochastic process seam between models and the pricing engine.
//!
//! The engine drives a process through one time step at a time, feeding it
//! standard normal draws; the process owns everything market-dependent
//! (spot, volatility, the curves behind the drift). Dynamic dispatch keeps
//! the engine free of model type parameters, and `Send + Sync` bounds let
//! path batches evolve the same process from worker threads.

use std::sync::Arc;

use tarf_core::market_data::YieldCurve;

use super::error::ModelError;

/// Shared handle to a yield curve consumed by models and engines.
pub type SharedCurve = Arc<dyn YieldCurve<f64> + Send + Sync>;

/// A one-factor stochastic process in state space `f64`.
///
/// Implementations advance the state with an exact or discretised step;
/// `dw` is always a draw from the standard normal distribution, scaled
/// internally by the step's `sqrt(dt)`.
pub trait StochasticProcess: Send + Sync {
    /// The state at time zero.
    fn initial_value(&self) -> f64;

    /// Evolves the state `x0` at time `t0` over a step of length `dt`.
    ///
    /// `dt` must be positive: drifts are read off curves as forward rates
    /// over `[t0, t0 + dt]`, which is undefined for an empty interval.
    ///
    /// # Errors
    ///
    /// Propagates curve lookup failures as [`ModelError::Curve`].
    fn evolve(&self, t0: f64, x0: f64, dt: f64, dw: f64) -> Result<f64, ModelError>;

    /// A short human-readable identifier used in diagnostics.
    fn name(&self) -> &'static str;
}
