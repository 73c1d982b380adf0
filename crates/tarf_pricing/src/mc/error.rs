//! Error types for Monte Carlo engine configuration and execution.

use tarf_core::market_data::MarketDataError;
use tarf_models::models::ModelError;
use thiserror::Error;

use crate::proxy::DomainError;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Neither or both of `steps` and `steps_per_year` were supplied.
    #[error("Exactly one of steps or steps_per_year must be set")]
    StepsSpecification,

    /// Neither or both of `samples` and `tolerance` were supplied.
    #[error("Exactly one of samples or tolerance must be set")]
    SamplesSpecification,

    /// Tolerance-driven sampling was requested from a random source
    /// without an error estimate.
    #[error("Tolerance requires a random source with an error estimate")]
    ToleranceUnsupported,

    /// A parameter failed validation.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rendered value that was rejected.
        value: String,
    },

    /// Every fixing in the schedule is on or before the valuation date.
    #[error("No open fixings remain after the valuation date")]
    NoOpenFixings,

    /// The contract has already accumulated its target.
    #[error("Contract terminated: accumulated {accumulated} >= target {target}")]
    ContractTerminated {
        /// Accumulated intrinsic value carried into the valuation.
        accumulated: f64,
        /// Knockout target of the contract.
        target: f64,
    },
}

/// Any failure raised while constructing or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine configuration was rejected.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Proxy-surface regression failed.
    #[error("Proxy construction error: {0}")]
    Domain(#[from] DomainError),

    /// The stochastic process rejected an evolution step.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// A curve lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}
