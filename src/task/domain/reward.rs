//! Reward amounts stored in indivisible micro-units.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of micro-units in one major currency unit.
pub const MICRO_UNITS_PER_UNIT: u64 = 1_000_000;

/// Positive reward amount in micro-units.
///
/// # Examples
///
/// ```
/// use bounty_board::task::domain::RewardAmount;
///
/// let reward = RewardAmount::from_major(5.0).expect("valid reward");
/// assert_eq!(reward.micro_units(), 5_000_000);
/// assert_eq!(reward.format_major(), "5.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardAmount(u64);

impl RewardAmount {
    /// Creates a reward from a micro-unit amount.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidReward`] when the amount is zero.
    pub const fn from_micro_units(micro_units: u64) -> Result<Self, TaskDomainError> {
        if micro_units == 0 {
            return Err(TaskDomainError::InvalidReward);
        }
        Ok(Self(micro_units))
    }

    /// Converts a fractional major-unit amount, rounding to the nearest
    /// micro-unit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidReward`] when the input is not
    /// finite, is not positive, rounds to zero, or does not fit in `u64`.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "caller-facing amounts are fractional; range is checked before the cast"
    )]
    pub fn from_major(major_units: f64) -> Result<Self, TaskDomainError> {
        if !major_units.is_finite() || major_units <= 0.0 {
            return Err(TaskDomainError::InvalidReward);
        }
        let scaled = (major_units * MICRO_UNITS_PER_UNIT as f64).round();
        if scaled >= u64::MAX as f64 {
            return Err(TaskDomainError::InvalidReward);
        }
        Self::from_micro_units(scaled as u64)
    }

    /// Returns the amount in micro-units.
    #[must_use]
    pub const fn micro_units(self) -> u64 {
        self.0
    }

    /// Returns the amount in major units.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "display-side conversion mirrors the caller-facing unit"
    )]
    pub fn as_major(self) -> f64 {
        self.0 as f64 / MICRO_UNITS_PER_UNIT as f64
    }

    /// Formats the amount in major units with two decimal places, rounding
    /// half up.
    #[must_use]
    pub fn format_major(self) -> String {
        let hundredths = self
            .0
            .saturating_add(5_000)
            .div_euclid(MICRO_UNITS_PER_UNIT.div_euclid(100));
        format!("{}.{:02}", hundredths.div_euclid(100), hundredths.rem_euclid(100))
    }
}

impl fmt::Display for RewardAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_major())
    }
}
