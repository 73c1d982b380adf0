//! Numerical building blocks.
//!
//! Currently hosts polynomial least-squares fitting, used to regress
//! simulated payout values against spot levels.

pub mod least_squares;

pub use least_squares::{fit_polynomial, fit_quadratic, LeastSquaresError};
