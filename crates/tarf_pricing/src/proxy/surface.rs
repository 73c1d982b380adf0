//! The assembled proxy surface handed back with pricing results.

use std::sync::Arc;

use tarf_core::types::Date;

use super::error::SurfaceError;
use super::function::ProxyFunction;
use super::store::bucket_index;

/// Piecewise regression surface for fast repricing of a target
/// redemption forward after the simulation that built it.
///
/// The surface is indexed by the number of fixings still open and by
/// the amount accumulated so far: row `r` serves valuations with
/// `r + 1` open fixings, and within a row the accumulated amount picks
/// an accumulation bucket whose fitted function maps spot to value.
///
/// Values are net present values as of [`origin_date`], inclusive of
/// the contract nominal. The surface does not know whether the target
/// has since been breached; callers must check the termination state
/// themselves before reading a value from it.
///
/// [`origin_date`]: ProxySurface::origin_date
#[derive(Clone, Debug, PartialEq)]
pub struct ProxySurface {
    origin_date: Date,
    open_fixing_dates: Vec<Date>,
    bucket_limits: Vec<f64>,
    last_payment_date: Date,
    grid: Vec<Vec<Arc<ProxyFunction>>>,
}

impl ProxySurface {
    /// Assembles a surface from a fitted grid.
    ///
    /// `open_fixing_dates` are ascending and aligned with the grid:
    /// one row per date still open on the origin date.
    pub(crate) fn new(
        origin_date: Date,
        open_fixing_dates: Vec<Date>,
        bucket_limits: Vec<f64>,
        last_payment_date: Date,
        grid: Vec<Vec<Arc<ProxyFunction>>>,
    ) -> Self {
        debug_assert_eq!(open_fixing_dates.len(), grid.len());
        Self {
            origin_date,
            open_fixing_dates,
            bucket_limits,
            last_payment_date,
            grid,
        }
    }

    /// Valuation date of the simulation that built the surface.
    #[inline]
    pub fn origin_date(&self) -> Date {
        self.origin_date
    }

    /// Fixing dates that were still open on the origin date.
    #[inline]
    pub fn open_fixing_dates(&self) -> &[Date] {
        &self.open_fixing_dates
    }

    /// Lower accumulated-amount fences of the buckets, starting at zero.
    #[inline]
    pub fn bucket_limits(&self) -> &[f64] {
        &self.bucket_limits
    }

    /// Payment date of the final fixing; the surface is meaningless
    /// beyond it.
    #[inline]
    pub fn last_payment_date(&self) -> Date {
        self.last_payment_date
    }

    /// Number of fixing rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Fitted function of one cell, if the indices are in range.
    ///
    /// Buckets merged during construction return handles to the same
    /// allocation, which [`Arc::ptr_eq`] can observe.
    pub fn function(&self, row: usize, bucket: usize) -> Option<&Arc<ProxyFunction>> {
        self.grid.get(row)?.get(bucket)
    }

    /// Counts the fixing dates strictly after `date`.
    ///
    /// A fixing on the queried date itself counts as already fixed.
    pub fn open_fixings_at(&self, date: Date) -> usize {
        let fixed = self
            .open_fixing_dates
            .partition_point(|&fixing| fixing <= date);
        self.open_fixing_dates.len() - fixed
    }

    /// Evaluates row `row` (serving `row + 1` open fixings) at the
    /// given accumulated amount and spot.
    pub fn evaluate(&self, row: usize, accumulated: f64, spot: f64) -> Result<f64, SurfaceError> {
        let functions = self.grid.get(row).ok_or(SurfaceError::RowOutOfRange {
            row,
            rows: self.grid.len(),
        })?;
        let bucket = bucket_index(&self.bucket_limits, accumulated);
        Ok(functions[bucket].evaluate(spot))
    }

    /// Evaluates the surface for a valuation on `date`.
    ///
    /// The row is chosen from the number of fixings still open on that
    /// date; once no fixing remains open the surface has nothing left
    /// to say and the query fails with [`SurfaceError::Expired`].
    pub fn evaluate_at(
        &self,
        date: Date,
        accumulated: f64,
        spot: f64,
    ) -> Result<f64, SurfaceError> {
        let open = self.open_fixings_at(date);
        if open == 0 {
            return Err(SurfaceError::Expired { date });
        }
        self.evaluate(open - 1, accumulated, spot)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn constant(value: f64) -> Arc<ProxyFunction> {
        Arc::new(ProxyFunction::Constant {
            value,
            core_region: (1.0, 1.0),
        })
    }

    /// Three fixing rows, two buckets fenced at 0.05, constant cells
    /// valued `10 * (row + 1) + bucket`.
    fn surface() -> ProxySurface {
        let grid = (0..3)
            .map(|row| {
                (0..2)
                    .map(|bucket| constant((10 * (row + 1) + bucket) as f64))
                    .collect()
            })
            .collect();
        ProxySurface::new(
            date("2026-01-01"),
            vec![date("2026-01-15"), date("2026-02-15"), date("2026-03-15")],
            vec![0.0, 0.05],
            date("2026-03-17"),
            grid,
        )
    }

    #[test]
    fn test_open_fixings_shrink_as_dates_pass() {
        let surface = surface();
        assert_eq!(surface.open_fixings_at(date("2026-01-01")), 3);
        assert_eq!(surface.open_fixings_at(date("2026-01-14")), 3);
        // A fixing on the queried date is no longer open.
        assert_eq!(surface.open_fixings_at(date("2026-01-15")), 2);
        assert_eq!(surface.open_fixings_at(date("2026-03-14")), 1);
        assert_eq!(surface.open_fixings_at(date("2026-03-15")), 0);
    }

    #[test]
    fn test_evaluate_routes_row_and_bucket() {
        let surface = surface();
        assert_relative_eq!(surface.evaluate(0, 0.0, 1.2).unwrap(), 10.0);
        assert_relative_eq!(surface.evaluate(0, 0.049, 1.2).unwrap(), 10.0);
        assert_relative_eq!(surface.evaluate(0, 0.05, 1.2).unwrap(), 11.0);
        assert_relative_eq!(surface.evaluate(2, 0.2, 1.2).unwrap(), 31.0);
    }

    #[test]
    fn test_row_out_of_range_is_reported() {
        let surface = surface();
        assert_eq!(
            surface.evaluate(3, 0.0, 1.2).unwrap_err(),
            SurfaceError::RowOutOfRange { row: 3, rows: 3 }
        );
    }

    #[test]
    fn test_evaluate_at_selects_the_row_for_the_date() {
        let surface = surface();
        // Three fixings open: row 2.
        assert_relative_eq!(
            surface.evaluate_at(date("2026-01-01"), 0.0, 1.2).unwrap(),
            30.0
        );
        // One fixing open: row 0, second bucket.
        assert_relative_eq!(
            surface.evaluate_at(date("2026-03-01"), 0.07, 1.2).unwrap(),
            11.0
        );
        assert_eq!(
            surface.evaluate_at(date("2026-03-15"), 0.0, 1.2).unwrap_err(),
            SurfaceError::Expired {
                date: date("2026-03-15")
            }
        );
    }

    #[test]
    fn test_identically_built_surfaces_compare_equal() {
        assert_eq!(surface(), surface());
    }
}
