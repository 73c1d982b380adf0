//! Option types and plain intrinsic payoffs.

use std::fmt;

use super::error::InstrumentError;

/// Direction of an option payoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy: pays `max(S - K, 0)`.
    Call,
    /// Right to sell: pays `max(K - S, 0)`.
    Put,
}

impl OptionType {
    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Returns true for puts.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, OptionType::Put)
    }

    /// Payoff direction as a sign: `+1.0` for calls, `-1.0` for puts.
    ///
    /// The intrinsic value is `max(sign * (S - K), 0)` for both types.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Standard display name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Plain vanilla payoff with a fixed strike.
///
/// Evaluates the undiscounted intrinsic value at a spot level. The TARF
/// carries one of these per leg; the engine's proxy pipeline also reads
/// the option type to orient its cutoff search.
///
/// # Examples
///
/// ```
/// use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
///
/// let call = StrikedPayoff::new(OptionType::Call, 1.10).unwrap();
/// assert_eq!(call.value(1.15), 0.05);
/// assert_eq!(call.value(1.05), 0.0);
///
/// let put = StrikedPayoff::new(OptionType::Put, 1.10).unwrap();
/// assert_eq!(put.value(1.05), 0.05);
/// assert_eq!(put.value(1.15), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikedPayoff {
    option_type: OptionType,
    strike: f64,
}

impl StrikedPayoff {
    /// Constructs a payoff with the given type and strike.
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError::InvalidStrike` unless the strike is
    /// positive and finite.
    pub fn new(option_type: OptionType, strike: f64) -> Result<Self, InstrumentError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        Ok(Self {
            option_type,
            strike,
        })
    }

    /// Returns the option type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Intrinsic value at the given spot: `max(sign * (S - K), 0)`.
    #[inline]
    pub fn value(&self, spot: f64) -> f64 {
        (self.option_type.sign() * (spot - self.strike)).max(0.0)
    }
}
