//! Advisory deadline display.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Time left before a task deadline.
///
/// Expiry is display-only and never changes a task's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    /// The deadline has passed.
    Expired,
    /// Time left until the deadline.
    Remaining(Duration),
}

impl TimeRemaining {
    /// Computes the time remaining from `now` until `deadline`.
    #[must_use]
    pub fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining = deadline.signed_duration_since(now);
        if remaining < Duration::zero() {
            Self::Expired
        } else {
            Self::Remaining(remaining)
        }
    }

    /// Returns `true` when the deadline has passed.
    #[must_use]
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Remaining(remaining) = *self else {
            return f.write_str("Expired");
        };

        let days = remaining.num_days();
        let after_days = remaining - Duration::days(days);
        let hours = after_days.num_hours();
        let minutes = (after_days - Duration::hours(hours)).num_minutes();

        if days > 0 {
            write!(f, "{days}d {hours}h")
        } else if hours > 0 {
            write!(f, "{hours}h {minutes}m")
        } else {
            write!(f, "{minutes}m")
        }
    }
}
