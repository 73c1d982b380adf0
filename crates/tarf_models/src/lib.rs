//! # tarf_models: Instrument and Model Layer for the TARF Proxy Pricer
//!
//! ## Layer 2 (Business Logic) Role
//!
//! tarf_models sits between the foundation layer (`tarf_core`) and the
//! pricing engine (`tarf_pricing`), providing:
//! - Option payoffs: `OptionType`, `StrikedPayoff` (`instruments::payoff`)
//! - The target redemption forward: `FxTarf`, `CouponType`, and the
//!   `TarfContract` seam the engine prices against (`instruments::fx`)
//! - Fixing schedules with paired payment dates (`schedules`)
//! - Stochastic processes: the `StochasticProcess` seam and the
//!   Garman-Kohlhagen GBM implementation (`models`)
//!
//! ## Design Principles
//!
//! - **Validated construction**: instruments and schedules reject
//!   inconsistent inputs at build time with typed errors
//! - **Trait seams for the engine**: `TarfContract` and
//!   `StochasticProcess` are object-safe so the pricer can hold them as
//!   shared handles
//! - **Per-unit-nominal payouts**: contract maths is expressed per unit
//!   of source nominal; scaling is the engine's concern
//!
//! ## Usage Example
//!
//! ```rust
//! use tarf_core::types::time::Date;
//! use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
//! use tarf_models::instruments::fx::{CouponType, FxTarf};
//! use tarf_models::schedules::FixingSchedule;
//!
//! let first_fixing = Date::from_ymd(2025, 7, 15).unwrap();
//! let schedule = FixingSchedule::monthly(first_fixing, 12, 2).unwrap();
//!
//! let tarf = FxTarf::new(
//!     schedule,
//!     StrikedPayoff::new(OptionType::Call, 1.10).unwrap(),
//!     StrikedPayoff::new(OptionType::Put, 1.10).unwrap(),
//!     0.10,  // target
//!     0.0,   // accumulated so far
//!     100_000.0,
//!     CouponType::Capped,
//! )
//! .unwrap();
//!
//! // One in-the-money fixing accrues the ungeared long intrinsic
//! let mut accumulated = 0.0;
//! let cash = tarf.payout(1.15, &mut accumulated);
//! assert!((cash - 0.05).abs() < 1e-12);
//! assert!((accumulated - 0.05).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod instruments;
pub mod models;
pub mod schedules;
