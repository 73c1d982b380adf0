//! # tarf_pricing: Monte Carlo Engine and Proxy Surface for the TARF Pricer
//!
//! ## Layer 3 (Pricing) Role
//!
//! tarf_pricing sits on top of `tarf_core` (maths, curves, dates) and
//! `tarf_models` (the TARF contract and its stochastic process),
//! providing:
//! - The Monte Carlo engine: time grid, Brownian bridge, antithetic
//!   variates, fixed-sample and tolerance-driven sampling (`mc`)
//! - Reproducible random sources with per-path sub-streams (`rng`)
//! - The proxy surface: per (open fixings, accumulated amount) cell,
//!   a regression of path values against spot, for fast repricing
//!   without re-simulation (`proxy`)
//!
//! ## Design Principles
//!
//! - **Bit-reproducibility**: a seeded engine produces identical values
//!   and surfaces on every run and any thread count; parallel chunks
//!   fold back in a fixed order
//! - **Typed failure**: configuration, market data, model and
//!   regression problems surface as distinct error types, never as
//!   silently defaulted values
//! - **The surface is honest about its domain**: each cell carries the
//!   spot range it was fitted on, and queries past it rely on explicit
//!   clamp and tangent extrapolation rules
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tarf_core::market_data::FlatCurve;
//! use tarf_core::types::Date;
//! use tarf_models::instruments::fx::{CouponType, FxTarf};
//! use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
//! use tarf_models::models::{GbmProcess, SharedCurve};
//! use tarf_models::schedules::FixingSchedule;
//! use tarf_pricing::mc::{McEngineConfig, McTarfEngine, RunningStatistics};
//! use tarf_pricing::rng::PseudoRandomSource;
//!
//! let domestic: SharedCurve = Arc::new(FlatCurve::new(0.02));
//! let foreign: SharedCurve = Arc::new(FlatCurve::new(0.01));
//!
//! let schedule = FixingSchedule::monthly(Date::from_ymd(2026, 2, 16)?, 12, 2)?;
//! let tarf = FxTarf::new(
//!     schedule,
//!     StrikedPayoff::new(OptionType::Call, 1.10)?,
//!     StrikedPayoff::new(OptionType::Put, 1.10)?,
//!     0.10,
//!     0.0,
//!     1_000_000.0,
//!     CouponType::Capped,
//! )?;
//! let process = GbmProcess::new(1.15, 0.12, Arc::clone(&domestic), foreign)?;
//!
//! let config = McEngineConfig {
//!     steps_per_year: Some(24),
//!     samples: Some(2_000),
//!     seed: 42,
//!     ..McEngineConfig::default()
//! };
//! let mut engine = McTarfEngine::new(
//!     Arc::new(process),
//!     domestic,
//!     Arc::new(tarf),
//!     Arc::new(PseudoRandomSource::new()),
//!     Box::new(RunningStatistics::new()),
//!     Date::from_ymd(2026, 1, 15)?,
//!     config,
//! )?;
//!
//! let results = engine.calculate()?;
//! let surface = results.proxy().expect("proxy generation is on by default");
//!
//! // The surface reprices the live contract on a later date from the
//! // spot and the amount accumulated by then.
//! let value = surface.evaluate_at(Date::from_ymd(2026, 5, 1)?, 0.03, 1.13)?;
//! assert!(value.is_finite());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod proxy;
pub mod rng;
