//! FX structured products.

pub mod tarf;

pub use tarf::{CouponType, FxTarf, TarfContract};
