//! Integer money and time quantities.

use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTES_PER_HOUR: u64 = 60;
const CENTS_PER_UNIT: u64 = 100;

/// Monetary amount expressed in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(u64);

impl Cents {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the number of cents.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns `true` for the zero amount.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Values `minutes` of work at this hourly rate, rounding down to the
    /// cent.
    #[must_use]
    pub fn for_minutes(self, minutes: WorkedMinutes) -> Self {
        let total = self.0.saturating_mul(u64::from(minutes.value()));
        Self(total.div_euclid(MINUTES_PER_HOUR))
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0.div_euclid(CENTS_PER_UNIT),
            self.0.rem_euclid(CENTS_PER_UNIT)
        )
    }
}

/// Whole minutes of logged work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkedMinutes(u32);

impl WorkedMinutes {
    /// Creates a duration from whole minutes.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates a duration from whole hours.
    #[must_use]
    pub const fn from_hours(hours: u32) -> Self {
        Self(hours.saturating_mul(60))
    }

    /// Returns the number of minutes.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` when no time was logged.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two durations, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for WorkedMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h{:02}", self.0.div_euclid(60), self.0.rem_euclid(60))
    }
}
