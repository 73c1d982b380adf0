//! Stochastic process models and the engine-facing process trait.

pub mod error;
pub mod gbm;
pub mod stochastic;

pub use error::ModelError;
pub use gbm::GbmProcess;
pub use stochastic::{SharedCurve, StochasticProcess};
