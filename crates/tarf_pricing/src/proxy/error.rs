//! Error types for proxy-surface construction and queries.

use tarf_core::types::Date;
use thiserror::Error;

/// Regression failure while building the surface.
///
/// Both variants are fatal for the valuation: they indicate the sample
/// count is too low for surface generation at the reported fixing and
/// should be raised by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A regression segment holds fewer observations than required.
    #[error(
        "Fixing {fixing_index}: {segment} segment has {got} observations, needs {need}"
    )]
    SegmentTooSmall {
        /// Chronological index of the open fixing.
        fixing_index: usize,
        /// Which segment ran dry, `"below"` or `"above"` the cutoff.
        segment: &'static str,
        /// Observations available after merging.
        got: usize,
        /// Configured minimum per segment.
        need: usize,
    },

    /// The least-squares normal equations were singular.
    #[error("Fixing {fixing_index}: singular regression on {segment} segment")]
    SingularRegression {
        /// Chronological index of the open fixing.
        fixing_index: usize,
        /// Which segment failed, `"below"` or `"above"` the cutoff.
        segment: &'static str,
    },
}

/// Rejected proxy-surface query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Fixing row beyond the stored grid.
    #[error("Fixing row {row} out of range: surface has {rows} rows")]
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Rows the surface holds.
        rows: usize,
    },

    /// Date-based query on or after the last fixing date.
    #[error("No open fixings remain at {date}")]
    Expired {
        /// Query date.
        date: Date,
    },
}
