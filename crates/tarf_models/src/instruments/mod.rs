//! Instruments and their payoff building blocks.

pub mod error;
pub mod fx;
pub mod payoff;

pub use error::InstrumentError;
pub use fx::{CouponType, FxTarf, TarfContract};
pub use payoff::{OptionType, StrikedPayoff};
