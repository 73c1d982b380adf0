//! Core types: dates, day-count conventions, and their error types.

pub mod error;
pub mod time;

pub use error::DateError;
pub use time::{Date, DayCountConvention};
