//! The FX target redemption forward.

use crate::instruments::error::InstrumentError;
use crate::instruments::payoff::{OptionType, StrikedPayoff};
use crate::schedules::FixingSchedule;

/// Treatment of the coupon paid at the knockout fixing.
///
/// When a fixing pushes the accumulated amount across the target, the
/// structure terminates. The crossing fixing's own cash flow is governed
/// by this setting; fixings after the crossing never pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CouponType {
    /// The crossing fixing pays nothing.
    None,
    /// The crossing fixing pays at most the remaining room below the
    /// target, `target - accumulated_before`.
    Capped,
    /// The crossing fixing pays in full.
    Full,
}

/// A target redemption forward on an exchange rate.
///
/// The holder is long one striked payoff and short another, observed on
/// each fixing date of the schedule. Every fixing's *ungeared long
/// intrinsic* accrues toward the target; once the accumulated amount
/// reaches it the structure knocks out and later fixings pay nothing.
/// The crossing fixing itself pays according to the [`CouponType`].
///
/// The accumulated amount always tracks the full intrinsic, independent
/// of the coupon type: a capped or suppressed knockout coupon changes
/// the cash paid, not the trigger bookkeeping. Gearings scale cash
/// flows only, never the accrual.
///
/// All payout maths is per unit of source nominal; `source_nominal`
/// is the engine's scaling factor.
///
/// # Examples
///
/// ```
/// use tarf_core::types::time::Date;
/// use tarf_models::instruments::fx::{CouponType, FxTarf};
/// use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
/// use tarf_models::schedules::FixingSchedule;
///
/// let schedule = FixingSchedule::monthly(
///     Date::from_ymd(2025, 7, 15).unwrap(),
///     12,
///     2,
/// ).unwrap();
///
/// let tarf = FxTarf::new(
///     schedule,
///     StrikedPayoff::new(OptionType::Call, 1.10).unwrap(),
///     StrikedPayoff::new(OptionType::Put, 1.10).unwrap(),
///     0.10,
///     0.0,
///     1_000_000.0,
///     CouponType::Capped,
/// ).unwrap();
///
/// // In the money: cash equals the intrinsic, which also accrues
/// let mut acc = 0.0;
/// assert!((tarf.payout(1.15, &mut acc) - 0.05).abs() < 1e-12);
///
/// // Out of the money: the short put bites, nothing accrues
/// assert!((tarf.payout(1.05, &mut acc) - (-0.05)).abs() < 1e-12);
/// assert!((acc - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxTarf {
    schedule: FixingSchedule,
    payoff_long: StrikedPayoff,
    payoff_short: StrikedPayoff,
    target: f64,
    accumulated_amount: f64,
    source_nominal: f64,
    coupon_type: CouponType,
    gearing_long: f64,
    gearing_short: f64,
}

impl FxTarf {
    /// Constructs a TARF with unit gearings on both legs.
    ///
    /// `accumulated_amount` is the intrinsic already accrued by past
    /// fixings (full-coupon convention, see the type-level notes). An
    /// amount at or above the target is representable; the contract is
    /// then knocked out and pays nothing.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidTarget` - target not positive/finite
    /// * `InstrumentError::InvalidAccumulated` - accumulated negative or non-finite
    /// * `InstrumentError::InvalidNominal` - nominal not positive/finite
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        schedule: FixingSchedule,
        payoff_long: StrikedPayoff,
        payoff_short: StrikedPayoff,
        target: f64,
        accumulated_amount: f64,
        source_nominal: f64,
        coupon_type: CouponType,
    ) -> Result<Self, InstrumentError> {
        if !target.is_finite() || target <= 0.0 {
            return Err(InstrumentError::InvalidTarget { target });
        }
        if !accumulated_amount.is_finite() || accumulated_amount < 0.0 {
            return Err(InstrumentError::InvalidAccumulated {
                accumulated: accumulated_amount,
            });
        }
        if !source_nominal.is_finite() || source_nominal <= 0.0 {
            return Err(InstrumentError::InvalidNominal {
                nominal: source_nominal,
            });
        }
        Ok(Self {
            schedule,
            payoff_long,
            payoff_short,
            target,
            accumulated_amount,
            source_nominal,
            coupon_type,
            gearing_long: 1.0,
            gearing_short: 1.0,
        })
    }

    /// Replaces the unit gearings.
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError::InvalidGearing` unless both gearings
    /// are positive and finite.
    pub fn with_gearings(
        mut self,
        gearing_long: f64,
        gearing_short: f64,
    ) -> Result<Self, InstrumentError> {
        if !gearing_long.is_finite() || gearing_long <= 0.0 {
            return Err(InstrumentError::InvalidGearing {
                side: "long",
                gearing: gearing_long,
            });
        }
        if !gearing_short.is_finite() || gearing_short <= 0.0 {
            return Err(InstrumentError::InvalidGearing {
                side: "short",
                gearing: gearing_short,
            });
        }
        self.gearing_long = gearing_long;
        self.gearing_short = gearing_short;
        Ok(self)
    }

    /// The fixing schedule.
    #[inline]
    pub fn schedule(&self) -> &FixingSchedule {
        &self.schedule
    }

    /// The long-leg payoff.
    #[inline]
    pub fn payoff_long(&self) -> StrikedPayoff {
        self.payoff_long
    }

    /// The short-leg payoff.
    #[inline]
    pub fn payoff_short(&self) -> StrikedPayoff {
        self.payoff_short
    }

    /// The knockout target.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Intrinsic accrued by past fixings (full-coupon convention).
    #[inline]
    pub fn accumulated_amount(&self) -> f64 {
        self.accumulated_amount
    }

    /// The nominal that scales per-unit payouts to cash.
    #[inline]
    pub fn source_nominal(&self) -> f64 {
        self.source_nominal
    }

    /// The knockout coupon treatment.
    #[inline]
    pub fn coupon_type(&self) -> CouponType {
        self.coupon_type
    }

    /// Gearing of the long leg.
    #[inline]
    pub fn gearing_long(&self) -> f64 {
        self.gearing_long
    }

    /// Gearing of the short leg.
    #[inline]
    pub fn gearing_short(&self) -> f64 {
        self.gearing_short
    }

    /// Whether the given accumulated amount has reached the target.
    #[inline]
    pub fn is_knocked_out(&self, accumulated: f64) -> bool {
        accumulated >= self.target
    }

    /// Payout of one fixing per unit nominal, updating `accumulated`.
    ///
    /// Returns zero without touching `accumulated` when the structure is
    /// already knocked out. Otherwise the ungeared long intrinsic is
    /// added to `accumulated`; the returned cash is the geared long leg
    /// minus the geared short leg, reduced by the coupon rule when this
    /// fixing crosses the target.
    pub fn payout(&self, fixing: f64, accumulated: &mut f64) -> f64 {
        if self.is_knocked_out(*accumulated) {
            return 0.0;
        }
        let accumulated_before = *accumulated;
        *accumulated = accumulated_before + self.payoff_long.value(fixing);

        let cash = self.gearing_long * self.payoff_long.value(fixing)
            - self.gearing_short * self.payoff_short.value(fixing);

        if self.is_knocked_out(*accumulated) {
            match self.coupon_type {
                CouponType::None => 0.0,
                CouponType::Capped => cash.min(self.target - accumulated_before),
                CouponType::Full => cash,
            }
        } else {
            cash
        }
    }
}

/// The contract seam the pricing engine works against.
///
/// Object-safe so the engine can hold the instrument as a shared handle;
/// `Send + Sync` because path batches evaluate it from worker threads.
pub trait TarfContract: Send + Sync {
    /// Fixing schedule with paired payment dates.
    fn schedule(&self) -> &FixingSchedule;

    /// Knockout target.
    fn target(&self) -> f64;

    /// Intrinsic accrued by past fixings.
    fn accumulated_amount(&self) -> f64;

    /// Nominal scaling per-unit payouts to cash.
    fn source_nominal(&self) -> f64;

    /// Direction of the long leg; orients the proxy cutoff search.
    fn long_position_type(&self) -> OptionType;

    /// Per-unit payout of one fixing, updating `accumulated` (see
    /// [`FxTarf::payout`]).
    fn payout(&self, fixing: f64, accumulated: &mut f64) -> f64;
}

impl TarfContract for FxTarf {
    fn schedule(&self) -> &FixingSchedule {
        self.schedule()
    }

    fn target(&self) -> f64 {
        self.target()
    }

    fn accumulated_amount(&self) -> f64 {
        self.accumulated_amount()
    }

    fn source_nominal(&self) -> f64 {
        self.source_nominal()
    }

    fn long_position_type(&self) -> OptionType {
        self.payoff_long.option_type()
    }

    fn payout(&self, fixing: f64, accumulated: &mut f64) -> f64 {
        self.payout(fixing, accumulated)
    }
}
