//! Schedule validation errors.

use tarf_core::types::DateError;
use thiserror::Error;

/// Errors raised when constructing fixing schedules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A schedule needs at least one fixing.
    #[error("Schedule is empty")]
    Empty,

    /// Fixing and payment date lists must pair up.
    #[error("Length mismatch: {fixings} fixing dates vs {payments} payment dates")]
    LengthMismatch {
        /// Number of fixing dates
        fixings: usize,
        /// Number of payment dates
        payments: usize,
    },

    /// Fixing dates must be strictly increasing.
    #[error("Fixing dates not strictly increasing at index {index}")]
    UnsortedFixings {
        /// Index of the first offending fixing
        index: usize,
    },

    /// Payment dates must be non-decreasing.
    #[error("Payment dates decrease at index {index}")]
    UnsortedPayments {
        /// Index of the first offending payment
        index: usize,
    },

    /// Each payment must settle on or after its fixing.
    #[error("Payment before fixing at index {index}")]
    PaymentBeforeFixing {
        /// Index of the offending pair
        index: usize,
    },

    /// Date arithmetic failed while generating the schedule.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}
