//! Market data structures for the pricer.
//!
//! Discount curve abstractions used for payout discounting and for the
//! rate differential entering the exchange rate drift.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations (FlatCurve, InterpolatedCurve)
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use tarf_core::market_data::curves::{YieldCurve, FlatCurve};
//!
//! // Domestic curve at 5%, foreign at 1%
//! let domestic = FlatCurve::new(0.05_f64);
//! let foreign = FlatCurve::new(0.01_f64);
//!
//! let df = domestic.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//!
//! // Drift of the exchange rate under the domestic measure
//! let drift = domestic.zero_rate(1.0).unwrap() - foreign.zero_rate(1.0).unwrap();
//! assert!((drift - 0.04).abs() < 1e-10);
//! ```

pub mod curves;
pub mod error;

pub use curves::{CurveInterpolation, FlatCurve, InterpolatedCurve, YieldCurve};
pub use error::MarketDataError;
