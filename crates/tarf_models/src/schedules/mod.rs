//! Fixing schedules.
//!
//! The TARF observes the exchange rate on a list of fixing dates and
//! settles each observation on a paired payment date. [`FixingSchedule`]
//! validates the pairing and answers which fixings are still open at a
//! valuation date.

pub mod error;
pub mod fixing;

pub use error::ScheduleError;
pub use fixing::FixingSchedule;
