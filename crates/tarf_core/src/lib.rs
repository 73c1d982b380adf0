//! # tarf_core: Foundation Layer for the TARF Proxy Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! tarf_core serves as the bottom layer of the 3-layer architecture, providing:
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Discount curves: `YieldCurve`, `FlatCurve`, `InterpolatedCurve` (`market_data::curves`)
//! - Least-squares fitting for polynomial regression (`math::least_squares`)
//! - Error types: `DateError`, `MarketDataError`, `LeastSquaresError`
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other tarf_* crates, with minimal external
//! dependencies:
//! - num-traits: traits for generic numerical computation
//! - chrono: date arithmetic
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use tarf_core::types::time::{Date, DayCountConvention};
//! use tarf_core::market_data::curves::{FlatCurve, YieldCurve};
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2026, 1, 15).unwrap();
//! let t = DayCountConvention::Act365Fixed.year_fraction(start, end);
//!
//! let curve = FlatCurve::new(0.03_f64);
//! let df = curve.discount_factor(t).unwrap();
//! assert!(df < 1.0 && df > 0.9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialisation for `Date`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
