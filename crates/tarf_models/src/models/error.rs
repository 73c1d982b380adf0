//! Model construction and evolution errors.

use tarf_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors raised by stochastic process construction or evolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The spot must be positive and finite.
    #[error("Invalid spot: S = {spot}")]
    InvalidSpot {
        /// The offending spot value
        spot: f64,
    },

    /// Volatility must be non-negative and finite.
    #[error("Invalid volatility: sigma = {volatility}")]
    InvalidVolatility {
        /// The offending volatility value
        volatility: f64,
    },

    /// A curve lookup inside an evolution step failed.
    #[error("Curve lookup failed: {0}")]
    Curve(#[from] MarketDataError),
}
