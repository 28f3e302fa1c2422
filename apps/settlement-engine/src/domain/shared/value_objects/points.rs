//! Loyalty points value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A non-negative quantity of loyalty points.
///
/// Points are whole units; fractional point values never exist. Arithmetic
/// saturates at zero so a balance can never be driven negative by a bug in
/// a caller; the ledger rejects overspends before subtracting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u64);

impl Points {
    /// Zero points.
    pub const ZERO: Self = Self(0);

    /// Create a points quantity.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw point count.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if there are no points.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Monetary value of these points at the given unit value.
    #[must_use]
    pub fn currency_value(&self, unit_value: Decimal) -> Decimal {
        Decimal::from(self.0) * unit_value
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Points {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Points {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Points {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Points {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Points> for u64 {
    fn from(value: Points) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn points_new_and_display() {
        let p = Points::new(500);
        assert_eq!(p.value(), 500);
        assert_eq!(format!("{p}"), "500");
    }

    #[test]
    fn points_arithmetic_saturates() {
        assert_eq!(Points::new(100) + Points::new(50), Points::new(150));
        assert_eq!(Points::new(50) - Points::new(100), Points::ZERO);
    }

    #[test]
    fn points_currency_value() {
        let p = Points::new(100);
        assert_eq!(p.currency_value(dec!(0.01)), dec!(1.00));
    }

    #[test]
    fn points_ordering() {
        assert!(Points::new(100) > Points::new(50));
    }

    #[test]
    fn points_serde_roundtrip() {
        let p = Points::new(42);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "42");
        let parsed: Points = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
