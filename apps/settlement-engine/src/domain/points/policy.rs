//! Points economy policy.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Points};

/// Configurable points-economy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    /// Points earned per currency unit of a delivered order.
    pub order_earn_rate: Decimal,
    /// Points credited when a referred user signs up.
    pub signup_bonus: u64,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            order_earn_rate: dec!(0.01),
            signup_bonus: 100,
        }
    }
}

impl PointsPolicy {
    /// Points earned for an order of the given total.
    ///
    /// Always rounds down; partial points are never awarded.
    #[must_use]
    pub fn points_for_order(&self, total: Money) -> Points {
        let raw = total.amount() * self.order_earn_rate;
        Points::new(raw.floor().to_u64().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = PointsPolicy::default();
        assert_eq!(policy.order_earn_rate, dec!(0.01));
        assert_eq!(policy.signup_bonus, 100);
    }

    #[test]
    fn points_for_order_floors() {
        let policy = PointsPolicy::default();
        assert_eq!(policy.points_for_order(Money::from_major(179)), Points::new(1));
        assert_eq!(policy.points_for_order(Money::from_major(1000)), Points::new(10));
        assert_eq!(policy.points_for_order(Money::from_major(99)), Points::ZERO);
    }

    #[test]
    fn negative_total_earns_nothing() {
        let policy = PointsPolicy::default();
        let negative = Money::ZERO - Money::from_major(10);
        assert_eq!(policy.points_for_order(negative), Points::ZERO);
    }
}
