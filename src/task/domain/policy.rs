//! Posting limits applied when a task is created.

use super::{RewardAmount, TaskDomainError};
use serde::{Deserialize, Serialize};

/// Lowest reward any policy may accept: 0.1 major units.
pub const REWARD_FLOOR_MICRO_UNITS: u64 = 100_000;

/// Limits applied to new task postings.
///
/// # Examples
///
/// ```
/// use bounty_board::task::domain::TaskPostingPolicy;
///
/// let policy = TaskPostingPolicy::default();
/// assert_eq!(policy.min_reward_micro_units, 100_000);
///
/// let custom = TaskPostingPolicy::from_json(r#"{"max_duration_days": 30}"#)
///     .expect("valid policy");
/// assert_eq!(custom.max_duration_days, 30);
/// assert_eq!(custom.max_title_chars, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPostingPolicy {
    /// Smallest accepted reward in micro-units. Values below
    /// [`REWARD_FLOOR_MICRO_UNITS`] are raised to the floor.
    pub min_reward_micro_units: u64,
    /// Maximum title length in characters.
    pub max_title_chars: usize,
    /// Shortest accepted duration in days.
    pub min_duration_days: u32,
    /// Longest accepted duration in days.
    pub max_duration_days: u32,
}

impl Default for TaskPostingPolicy {
    fn default() -> Self {
        Self {
            min_reward_micro_units: REWARD_FLOOR_MICRO_UNITS,
            max_title_chars: 100,
            min_duration_days: 1,
            max_duration_days: 365,
        }
    }
}

impl TaskPostingPolicy {
    /// Parses a policy from JSON. Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }

    /// Validates a trimmed title against the length limit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::TitleTooLong`].
    pub fn check_title(&self, title: &str) -> Result<(), TaskDomainError> {
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let actual = title.chars().count();
        if actual > self.max_title_chars {
            return Err(TaskDomainError::TitleTooLong {
                max: self.max_title_chars,
                actual,
            });
        }
        Ok(())
    }

    /// Returns the enforced reward minimum, never below the floor.
    #[must_use]
    pub const fn effective_min_reward(&self) -> u64 {
        if self.min_reward_micro_units < REWARD_FLOOR_MICRO_UNITS {
            REWARD_FLOOR_MICRO_UNITS
        } else {
            self.min_reward_micro_units
        }
    }

    /// Validates a reward against the posting minimum.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RewardBelowMinimum`].
    pub const fn check_reward(&self, reward: RewardAmount) -> Result<(), TaskDomainError> {
        let minimum = self.effective_min_reward();
        if reward.micro_units() < minimum {
            return Err(TaskDomainError::RewardBelowMinimum {
                minimum,
                actual: reward.micro_units(),
            });
        }
        Ok(())
    }

    /// Validates a duration in days. Zero is always rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DurationOutOfRange`].
    pub const fn check_duration(&self, days: u32) -> Result<(), TaskDomainError> {
        let min = if self.min_duration_days == 0 {
            1
        } else {
            self.min_duration_days
        };
        if days < min || days > self.max_duration_days {
            return Err(TaskDomainError::DurationOutOfRange {
                days,
                min,
                max: self.max_duration_days,
            });
        }
        Ok(())
    }
}
