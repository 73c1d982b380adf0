//! Time types and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Industry-standard day count conventions
//! - Year fraction calculations for schedule and curve handling
//!
//! # Examples
//!
//! ```
//! use tarf_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! // Calculate year fraction using ACT/365F
//! let yf = DayCountConvention::Act365Fixed.year_fraction(start, end);
//! assert!((yf - 0.4959).abs() < 0.001);
//! ```

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation, standard date arithmetic, and
/// checked calendar shifts for schedule generation. The wrapper keeps
/// chrono out of downstream signatures while retaining access to its
/// full API through [`Date::into_inner`].
///
/// # Examples
///
/// ```
/// use tarf_core::types::time::Date;
///
/// // Create from year, month, day
/// let date = Date::from_ymd(2025, 6, 16).unwrap();
/// assert_eq!(date.year(), 2025);
/// assert_eq!(date.month(), 6);
/// assert_eq!(date.day(), 16);
///
/// // Parse from ISO 8601 string
/// let parsed: Date = "2025-06-16".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// // Calculate days between dates
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Arguments
    /// * `year` - Year (e.g., 2025)
    /// * `month` - Month (1-12)
    /// * `day` - Day (1-31, depending on month)
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::Date;
    ///
    /// // Valid date
    /// let date = Date::from_ymd(2025, 6, 16).unwrap();
    ///
    /// // Leap year February 29th
    /// let leap = Date::from_ymd(2024, 2, 29).unwrap();
    ///
    /// // Invalid date returns error
    /// let invalid = Date::from_ymd(2025, 2, 30);
    /// assert!(invalid.is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns today's date based on local system time.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::Date;
    ///
    /// let date = Date::parse("2025-06-16").unwrap();
    /// assert_eq!(date.year(), 2025);
    ///
    /// let invalid = Date::parse("not-a-date");
    /// assert!(invalid.is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    ///
    /// Use this method when you need access to chrono's full API.
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date forward by whole calendar months.
    ///
    /// Where the target month is shorter than the source day, the day is
    /// clamped to the end of month (e.g., 31 January + 1 month lands on
    /// 28 or 29 February). This matches standard roll behaviour for
    /// monthly fixing schedules.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::Date;
    ///
    /// let start = Date::from_ymd(2024, 1, 31).unwrap();
    /// let rolled = start.checked_add_months(1).unwrap();
    /// assert_eq!(rolled, Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn checked_add_months(self, months: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Date)
            .ok_or_else(|| DateError::Overflow {
                base: self.to_string(),
                op: format!("+{} months", months),
            })
    }

    /// Shifts the date forward by whole calendar days.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::Date;
    ///
    /// let start = Date::from_ymd(2025, 12, 30).unwrap();
    /// let shifted = start.checked_add_days(3).unwrap();
    /// assert_eq!(shifted, Date::from_ymd(2026, 1, 2).unwrap());
    /// ```
    pub fn checked_add_days(self, days: u64) -> Result<Self, DateError> {
        self.0
            .checked_add_days(Days::new(days))
            .map(Date)
            .ok_or_else(|| DateError::Overflow {
                base: self.to_string(),
                op: format!("+{} days", days),
            })
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::Date;
    ///
    /// let start = Date::from_ymd(2025, 1, 1).unwrap();
    /// let end = Date::from_ymd(2025, 1, 11).unwrap();
    ///
    /// assert_eq!(end - start, 10);
    /// assert_eq!(start - end, -10);
    /// ```
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count convention (year fraction convention).
///
/// # Variants
/// - `Act365Fixed`: Actual days / 365 (standard for FX derivatives)
/// - `Act360`: Actual days / 360 (common in money market instruments)
///
/// # Usage
///
/// ```
/// use tarf_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 7, 1).unwrap();
///
/// let yf = DayCountConvention::Act365Fixed.year_fraction(start, end);
/// // 181 days / 365.0 ≈ 0.4959
/// assert!((yf - 0.4959).abs() < 0.001);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    ///
    /// Used in:
    /// - Most FX and equity derivatives markets
    /// - UK gilts
    #[default]
    Act365Fixed,

    /// Actual/360: actual_days / 360.0
    ///
    /// Used in:
    /// - Money market instruments
    /// - US Treasury bills
    Act360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act365Fixed.name(), "ACT/365F");
    /// assert_eq!(DayCountConvention::Act360.name(), "ACT/360");
    /// ```
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act360 => "ACT/360",
        }
    }

    /// Calculates the year fraction between two dates.
    ///
    /// Returns a negative value when `start > end` instead of panicking;
    /// the sign carries the direction of the interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarf_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2025, 1, 1).unwrap();
    /// let end = Date::from_ymd(2025, 7, 1).unwrap();
    ///
    /// let yf = DayCountConvention::Act365Fixed.year_fraction(start, end);
    /// assert!((yf - 181.0 / 365.0).abs() < 1e-12);
    ///
    /// // Reversed dates return a negative value
    /// let yf_neg = DayCountConvention::Act365Fixed.year_fraction(end, start);
    /// assert!((yf_neg + 181.0 / 365.0).abs() < 1e-12);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let days = end - start;
        match self {
            DayCountConvention::Act365Fixed => days as f64 / 365.0,
            DayCountConvention::Act360 => days as f64 / 360.0,
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses a day count convention from string (case-insensitive).
    ///
    /// Supports multiple aliases for each convention:
    /// - ACT/365F: "ACT/365F", "ACT/365", "Actual/365 Fixed", "A365"
    /// - ACT/360: "ACT/360", "Actual/360", "A360"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '(', ')'], "").as_str() {
            "ACT365F" | "ACT365" | "ACTUAL365" | "ACTUAL365FIXED" | "A365" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Act360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}
