//! Monte Carlo simulation of the TARF.
//!
//! [`McTarfEngine`] owns the whole run: a [`TimeGrid`] through the open
//! fixing times, an optional Brownian bridge over that grid, a
//! [`RandomSource`](crate::rng::RandomSource) handing each path its own
//! variate stream, and [`Statistics`] folding discounted payoffs into
//! the estimate. Paths are evaluated in parallel but folded in a fixed
//! order, so a seeded run is bit-reproducible on any thread count.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod statistics;

mod sampler;

pub use bridge::BrownianBridge;
pub use config::{McEngineConfig, ProxySettings, DEFAULT_SEED};
pub use engine::{McTarfEngine, TarfResults};
pub use error::{ConfigurationError, EngineError};
pub use grid::TimeGrid;
pub use statistics::{RunningStatistics, Statistics};
