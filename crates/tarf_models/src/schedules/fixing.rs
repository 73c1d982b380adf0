//! Fixing schedules with paired payment dates.

use tarf_core::types::Date;

use super::error::ScheduleError;

/// A validated list of fixing dates, each paired with a payment date.
///
/// Invariants established at construction:
/// - at least one pair,
/// - fixing dates strictly increasing,
/// - payment dates non-decreasing,
/// - each payment on or after its fixing.
///
/// # Examples
///
/// ```
/// use tarf_core::types::time::Date;
/// use tarf_models::schedules::FixingSchedule;
///
/// let first = Date::from_ymd(2025, 7, 15).unwrap();
/// let schedule = FixingSchedule::monthly(first, 12, 2).unwrap();
///
/// assert_eq!(schedule.len(), 12);
/// assert_eq!(schedule.fixing_dates()[0], first);
///
/// // Fixings strictly after the valuation date are open
/// let valuation = Date::from_ymd(2025, 9, 1).unwrap();
/// let open = schedule.open_pairs(valuation);
/// assert_eq!(open.len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixingSchedule {
    fixing_dates: Vec<Date>,
    payment_dates: Vec<Date>,
}

impl FixingSchedule {
    /// Constructs a schedule from explicit fixing and payment dates.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::Empty` - No dates given
    /// * `ScheduleError::LengthMismatch` - Lists of different length
    /// * `ScheduleError::UnsortedFixings` - Fixings not strictly increasing
    /// * `ScheduleError::UnsortedPayments` - Payments decrease
    /// * `ScheduleError::PaymentBeforeFixing` - A payment precedes its fixing
    pub fn new(fixing_dates: Vec<Date>, payment_dates: Vec<Date>) -> Result<Self, ScheduleError> {
        if fixing_dates.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if fixing_dates.len() != payment_dates.len() {
            return Err(ScheduleError::LengthMismatch {
                fixings: fixing_dates.len(),
                payments: payment_dates.len(),
            });
        }
        for i in 0..fixing_dates.len() {
            if i > 0 && fixing_dates[i] <= fixing_dates[i - 1] {
                return Err(ScheduleError::UnsortedFixings { index: i });
            }
            if i > 0 && payment_dates[i] < payment_dates[i - 1] {
                return Err(ScheduleError::UnsortedPayments { index: i });
            }
            if payment_dates[i] < fixing_dates[i] {
                return Err(ScheduleError::PaymentBeforeFixing { index: i });
            }
        }
        Ok(Self {
            fixing_dates,
            payment_dates,
        })
    }

    /// Generates a monthly schedule of `count` fixings starting at
    /// `first_fixing`, each paying `payment_lag_days` calendar days after
    /// the fixing.
    ///
    /// Fixings roll on the anchor day of `first_fixing`, clamped to
    /// month-end where needed (a 31st rolls to a 28th/29th/30th in
    /// shorter months).
    ///
    /// # Errors
    ///
    /// * `ScheduleError::Empty` - `count` is zero
    /// * `ScheduleError::Date` - Date arithmetic left the representable range
    pub fn monthly(
        first_fixing: Date,
        count: usize,
        payment_lag_days: u64,
    ) -> Result<Self, ScheduleError> {
        if count == 0 {
            return Err(ScheduleError::Empty);
        }
        let mut fixing_dates = Vec::with_capacity(count);
        let mut payment_dates = Vec::with_capacity(count);
        for i in 0..count {
            let months = u32::try_from(i).unwrap_or(u32::MAX);
            let fixing = first_fixing.checked_add_months(months)?;
            let payment = fixing.checked_add_days(payment_lag_days)?;
            fixing_dates.push(fixing);
            payment_dates.push(payment);
        }
        Self::new(fixing_dates, payment_dates)
    }

    /// Number of fixing/payment pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.fixing_dates.len()
    }

    /// Always false: construction rejects empty schedules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fixing_dates.is_empty()
    }

    /// All fixing dates, ascending.
    #[inline]
    pub fn fixing_dates(&self) -> &[Date] {
        &self.fixing_dates
    }

    /// Payment dates, paired index-wise with the fixings.
    #[inline]
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    /// The final settlement date of the schedule.
    #[inline]
    pub fn last_payment_date(&self) -> Date {
        self.payment_dates[self.payment_dates.len() - 1]
    }

    /// The (fixing, payment) pairs whose fixing lies strictly after
    /// `value_date`, in chronological order.
    ///
    /// A fixing on the value date itself is treated as already fixed.
    pub fn open_pairs(&self, value_date: Date) -> Vec<(Date, Date)> {
        self.fixing_dates
            .iter()
            .zip(self.payment_dates.iter())
            .filter(|(fixing, _)| **fixing > value_date)
            .map(|(fixing, payment)| (*fixing, *payment))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_new_valid() {
        let schedule = FixingSchedule::new(
            vec![date(2025, 7, 15), date(2025, 8, 15)],
            vec![date(2025, 7, 17), date(2025, 8, 18)],
        )
        .unwrap();
        assert_eq!(schedule.len(), 2);
        assert!(!schedule.is_empty());
        assert_eq!(schedule.last_payment_date(), date(2025, 8, 18));
    }

    #[test]
    fn test_new_rejects_empty() {
        let result = FixingSchedule::new(vec![], vec![]);
        assert_eq!(result, Err(ScheduleError::Empty));
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = FixingSchedule::new(
            vec![date(2025, 7, 15), date(2025, 8, 15)],
            vec![date(2025, 7, 17)],
        );
        assert_eq!(
            result,
            Err(ScheduleError::LengthMismatch {
                fixings: 2,
                payments: 1
            })
        );
    }

    #[test]
    fn test_new_rejects_unsorted_fixings() {
        let result = FixingSchedule::new(
            vec![date(2025, 8, 15), date(2025, 7, 15)],
            vec![date(2025, 8, 17), date(2025, 8, 17)],
        );
        assert_eq!(result, Err(ScheduleError::UnsortedFixings { index: 1 }));
    }

    #[test]
    fn test_new_rejects_duplicate_fixings() {
        let result = FixingSchedule::new(
            vec![date(2025, 7, 15), date(2025, 7, 15)],
            vec![date(2025, 7, 17), date(2025, 7, 17)],
        );
        assert_eq!(result, Err(ScheduleError::UnsortedFixings { index: 1 }));
    }

    #[test]
    fn test_new_rejects_payment_before_fixing() {
        let result = FixingSchedule::new(vec![date(2025, 7, 15)], vec![date(2025, 7, 14)]);
        assert_eq!(result, Err(ScheduleError::PaymentBeforeFixing { index: 0 }));
    }

    #[test]
    fn test_new_rejects_decreasing_payments() {
        let result = FixingSchedule::new(
            vec![date(2025, 7, 15), date(2025, 8, 15)],
            vec![date(2025, 8, 20), date(2025, 8, 16)],
        );
        assert_eq!(result, Err(ScheduleError::UnsortedPayments { index: 1 }));
    }

    #[test]
    fn test_monthly_generation() {
        let schedule = FixingSchedule::monthly(date(2025, 7, 15), 3, 2).unwrap();
        assert_eq!(
            schedule.fixing_dates(),
            &[date(2025, 7, 15), date(2025, 8, 15), date(2025, 9, 15)]
        );
        assert_eq!(
            schedule.payment_dates(),
            &[date(2025, 7, 17), date(2025, 8, 17), date(2025, 9, 17)]
        );
    }

    #[test]
    fn test_monthly_anchors_on_original_day() {
        // 31 January rolls to the clamped month-ends but returns to the
        // 31st where the month allows it.
        let schedule = FixingSchedule::monthly(date(2024, 1, 31), 3, 0).unwrap();
        assert_eq!(
            schedule.fixing_dates(),
            &[date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn test_monthly_rejects_zero_count() {
        let result = FixingSchedule::monthly(date(2025, 7, 15), 0, 2);
        assert_eq!(result, Err(ScheduleError::Empty));
    }

    #[test]
    fn test_open_pairs_strictly_after() {
        let schedule = FixingSchedule::monthly(date(2025, 7, 15), 4, 2).unwrap();

        // Valuation on a fixing date: that fixing is no longer open
        let open = schedule.open_pairs(date(2025, 8, 15));
        assert_eq!(
            open,
            vec![
                (date(2025, 9, 15), date(2025, 9, 17)),
                (date(2025, 10, 15), date(2025, 10, 17)),
            ]
        );

        // Valuation before the first fixing: everything open
        assert_eq!(schedule.open_pairs(date(2025, 1, 1)).len(), 4);

        // Valuation after the last fixing: nothing open
        assert!(schedule.open_pairs(date(2026, 1, 1)).is_empty());
    }
}
