//! Instrument validation errors.

use thiserror::Error;

/// Errors raised when constructing instruments from inconsistent inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Strike must be positive and finite.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The offending strike value
        strike: f64,
    },

    /// The knockout target must be positive and finite.
    #[error("Invalid target: {target}")]
    InvalidTarget {
        /// The offending target value
        target: f64,
    },

    /// The accumulated amount must be non-negative and finite.
    #[error("Invalid accumulated amount: {accumulated}")]
    InvalidAccumulated {
        /// The offending accumulated value
        accumulated: f64,
    },

    /// The source nominal must be positive and finite.
    #[error("Invalid source nominal: {nominal}")]
    InvalidNominal {
        /// The offending nominal value
        nominal: f64,
    },

    /// Gearings must be positive and finite.
    #[error("Invalid {side} gearing: {gearing}")]
    InvalidGearing {
        /// Which leg the gearing belongs to ("long" or "short")
        side: &'static str,
        /// The offending gearing value
        gearing: f64,
    },
}
