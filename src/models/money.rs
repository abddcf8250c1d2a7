//! Money type for representing expense amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Source amounts arrive in the budgeting service's own minor unit
//! (milliunits for YNAB) and are converted here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert an amount in source minor units into cents
    ///
    /// `scale` is the number of minor units per major unit (1000 for YNAB
    /// milliunits, 100 for a cent-based source). Sub-cent remainders round
    /// half away from zero; results beyond the `i64` range saturate.
    ///
    /// # Examples
    /// ```
    /// use ynab_splitwise_sync::models::Money;
    /// assert_eq!(Money::from_minor_units(-4250, 1000).cents(), -425);
    /// ```
    pub fn from_minor_units(minor: i64, scale: i64) -> Self {
        debug_assert!(scale > 0);
        let scaled = i128::from(minor) * 100;
        let scale = i128::from(scale);
        let half = scale / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / scale
        } else {
            (scaled - half) / scale
        };
        Self(i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value, saturating at `i64::MAX`
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Plain decimal string with two places ("4.25"), the form expense APIs accept
    pub fn to_decimal_string(&self) -> String {
        if self.is_negative() {
            format!("-{}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self(0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_milliunits() {
        assert_eq!(Money::from_minor_units(4250, 1000).cents(), 425);
        assert_eq!(Money::from_minor_units(-4250, 1000).cents(), -425);
        assert_eq!(Money::from_minor_units(1000, 1000).cents(), 100);
    }

    #[test]
    fn test_from_cent_scale() {
        assert_eq!(Money::from_minor_units(4250, 100).cents(), 4250);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Money::from_minor_units(4255, 1000).cents(), 426);
        assert_eq!(Money::from_minor_units(4254, 1000).cents(), 425);
        assert_eq!(Money::from_minor_units(-4255, 1000).cents(), -426);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(425).to_decimal_string(), "4.25");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-1050).to_decimal_string(), "-10.50");
    }

    #[test]
    fn test_small_scale_saturates() {
        assert_eq!(Money::from_minor_units(i64::MAX, 1).cents(), i64::MAX);
        assert_eq!(Money::from_minor_units(i64::MIN, 1).cents(), i64::MIN);
        assert_eq!(Money::from_minor_units(i64::MIN, 1).abs().cents(), i64::MAX);
    }
}
