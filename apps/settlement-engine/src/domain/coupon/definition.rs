//! Coupon definition and the usage ledger record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{CouponCode, CouponId, Money, OrderId, Timestamp, UserId};

/// How a coupon's value translates into a discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum DiscountKind {
    /// Percentage off the order amount (e.g. `10` means 10%).
    Percentage(Decimal),
    /// Fixed amount off.
    Fixed(Money),
}

/// A coupon as defined by the promotions team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Coupon identifier.
    pub id: CouponId,
    /// Unique uppercase code entered at checkout.
    pub code: CouponCode,
    /// Discount computation.
    pub kind: DiscountKind,
    /// Order amount required before the coupon applies.
    pub minimum_order_amount: Option<Money>,
    /// Cap on the computed discount.
    pub maximum_discount: Option<Money>,
    /// Total redemptions allowed across all users.
    pub usage_limit: Option<u32>,
    /// Redemptions allowed per user.
    pub usage_limit_per_user: Option<u32>,
    /// Start of the validity window.
    pub valid_from: Timestamp,
    /// End of the validity window, open-ended when absent.
    pub valid_until: Option<Timestamp>,
    /// Kill switch.
    pub is_active: bool,
}

impl Coupon {
    /// Raw discount for an order amount, before subtotal capping.
    ///
    /// Percentage coupons compute against the amount; fixed coupons pay
    /// out their value. Both are then capped at `maximum_discount`.
    #[must_use]
    pub fn discount_for(&self, order_amount: Money) -> Money {
        let raw = match self.kind {
            DiscountKind::Percentage(pct) => (order_amount * (pct / Decimal::from(100))).round(),
            DiscountKind::Fixed(value) => value,
        };
        let capped = match self.maximum_discount {
            Some(cap) => raw.min(cap),
            None => raw,
        };
        capped.min(order_amount).clamp_non_negative()
    }
}

/// One redemption, appended when an order using the coupon is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponUsage {
    /// The redeemed coupon.
    pub coupon_id: CouponId,
    /// Who redeemed it.
    pub user_id: UserId,
    /// The order it was applied to.
    pub order_id: OrderId,
    /// When it was redeemed.
    pub used_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn coupon(kind: DiscountKind) -> Coupon {
        Coupon {
            id: CouponId::new("cpn-1"),
            code: CouponCode::new("SAVE10"),
            kind,
            minimum_order_amount: None,
            maximum_discount: None,
            usage_limit: None,
            usage_limit_per_user: None,
            valid_from: Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
            valid_until: None,
            is_active: true,
        }
    }

    #[test]
    fn percentage_discount() {
        let c = coupon(DiscountKind::Percentage(dec!(10)));
        assert_eq!(c.discount_for(Money::from_major(200)), Money::from_major(20));
    }

    #[test]
    fn fixed_discount() {
        let c = coupon(DiscountKind::Fixed(Money::from_major(15)));
        assert_eq!(c.discount_for(Money::from_major(200)), Money::from_major(15));
    }

    #[test]
    fn discount_capped_at_maximum() {
        let mut c = coupon(DiscountKind::Percentage(dec!(50)));
        c.maximum_discount = Some(Money::from_major(30));
        assert_eq!(c.discount_for(Money::from_major(200)), Money::from_major(30));
    }

    #[test]
    fn discount_capped_at_order_amount() {
        let c = coupon(DiscountKind::Fixed(Money::from_major(500)));
        assert_eq!(c.discount_for(Money::from_major(80)), Money::from_major(80));
    }

    #[test]
    fn percentage_rounds_to_cents() {
        let c = coupon(DiscountKind::Percentage(dec!(10)));
        assert_eq!(
            c.discount_for(Money::new(dec!(19.99))),
            Money::new(dec!(2.00))
        );
    }
}
