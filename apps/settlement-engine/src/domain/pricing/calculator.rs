//! The pricing calculator.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::policy::PricingPolicy;
use super::shipping::ShippingMethod;
use crate::domain::shared::{Money, Points};

/// Everything the calculator needs to price a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    /// Sum of line totals, already validated non-negative.
    pub subtotal: Money,
    /// Chosen delivery method.
    pub shipping_method: ShippingMethod,
    /// ISO country code of the shipping address.
    pub destination_country: String,
    /// True when every line is a digital good.
    pub all_digital: bool,
    /// Validated coupon discount, zero when no coupon applied.
    pub coupon_discount: Money,
    /// Points the buyer asked to redeem.
    pub points_requested: Points,
}

/// The priced result of a checkout.
///
/// Invariant: `total = subtotal + tax + shipping - discount - points_discount`,
/// clamped at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost from the rate table.
    pub shipping: Money,
    /// Flat-rate tax on the subtotal.
    pub tax: Money,
    /// Coupon discount, capped at the subtotal.
    pub discount: Money,
    /// Value redeemed from loyalty points.
    pub points_discount: Money,
    /// Amount the buyer pays.
    pub total: Money,
    /// Points actually consumed by this order.
    pub points_used: Points,
}

impl PriceBreakdown {
    /// A breakdown with every component zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            subtotal: Money::ZERO,
            shipping: Money::ZERO,
            tax: Money::ZERO,
            discount: Money::ZERO,
            points_discount: Money::ZERO,
            total: Money::ZERO,
            points_used: Points::ZERO,
        }
    }

    /// Check the breakdown identity.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let raw = self.subtotal + self.tax + self.shipping - self.discount - self.points_discount;
        self.total == raw.clamp_non_negative().round()
    }
}

/// Pure pricing calculator.
///
/// Holds only policy; every call is deterministic in its input.
#[derive(Debug, Clone)]
pub struct PricingCalculator {
    policy: PricingPolicy,
}

impl PricingCalculator {
    /// Create a calculator with the given policy.
    #[must_use]
    pub const fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// Create a calculator with default policy.
    #[must_use]
    pub fn with_default_policy() -> Self {
        Self::new(PricingPolicy::default())
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Compute the full price breakdown for a checkout.
    #[must_use]
    pub fn compute(&self, input: &PricingInput) -> PriceBreakdown {
        let subtotal = input.subtotal.clamp_non_negative();

        let shipping = if input.all_digital {
            Money::ZERO
        } else {
            self.policy
                .shipping
                .cost(input.shipping_method, &input.destination_country)
        };

        let tax = (subtotal * self.policy.tax_rate).round();

        // Coupon value can never exceed what the goods cost.
        let discount = input.coupon_discount.clamp_non_negative().min(subtotal);

        let (points_discount, points_used) =
            self.redeem_points(input.points_requested, subtotal - discount);

        let total = (subtotal + tax + shipping - discount - points_discount)
            .clamp_non_negative()
            .round();

        PriceBreakdown {
            subtotal,
            shipping,
            tax,
            discount,
            points_discount,
            total,
            points_used,
        }
    }

    /// Points redemption: value is capped at what remains of the subtotal
    /// after the coupon, and only points whose value fits are consumed.
    fn redeem_points(&self, requested: Points, remaining: Money) -> (Money, Points) {
        let unit = self.policy.points_unit_value;
        if requested.is_zero() || !unit.is_sign_positive() {
            return (Money::ZERO, Points::ZERO);
        }
        let requested_value = Money::new(requested.currency_value(unit));
        let points_discount = requested_value.min(remaining.clamp_non_negative());
        let consumed = (points_discount.amount() / unit)
            .floor()
            .to_u64()
            .unwrap_or(0);
        (points_discount, Points::new(consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn input(subtotal: Money) -> PricingInput {
        PricingInput {
            subtotal,
            shipping_method: ShippingMethod::Pickup,
            destination_country: "KE".to_string(),
            all_digital: false,
            coupon_discount: Money::ZERO,
            points_requested: Points::ZERO,
        }
    }

    #[test]
    fn plain_subtotal_passes_through() {
        let calc = PricingCalculator::with_default_policy();
        let breakdown = calc.compute(&input(Money::from_major(200)));
        assert_eq!(breakdown.total, Money::from_major(200));
        assert!(breakdown.is_consistent());
    }

    #[test]
    fn checkout_with_coupon_and_points() {
        // Cart of 200, 10% coupon already resolved to 20, 100 points at 0.01.
        let calc = PricingCalculator::with_default_policy();
        let mut inp = input(Money::from_major(200));
        inp.coupon_discount = Money::from_major(20);
        inp.points_requested = Points::new(100);

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.subtotal, Money::from_major(200));
        assert_eq!(breakdown.discount, Money::from_major(20));
        assert_eq!(breakdown.points_discount, Money::new(dec!(1.00)));
        assert_eq!(breakdown.points_used, Points::new(100));
        assert_eq!(breakdown.total, Money::from_major(179));
        assert!(breakdown.is_consistent());
    }

    #[test]
    fn shipping_added_for_physical_delivery() {
        let calc = PricingCalculator::with_default_policy();
        let mut inp = input(Money::from_major(100));
        inp.shipping_method = ShippingMethod::Express;
        inp.destination_country = "US".to_string();

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.shipping, Money::from_major(50));
        assert_eq!(breakdown.total, Money::from_major(150));
    }

    #[test]
    fn digital_only_cart_ships_free() {
        let calc = PricingCalculator::with_default_policy();
        let mut inp = input(Money::from_major(100));
        inp.shipping_method = ShippingMethod::Overnight;
        inp.all_digital = true;

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.shipping, Money::ZERO);
    }

    #[test]
    fn tax_applied_at_flat_rate() {
        let mut policy = PricingPolicy::default();
        policy.tax_rate = dec!(0.10);
        let calc = PricingCalculator::new(policy);

        let breakdown = calc.compute(&input(Money::from_major(200)));
        assert_eq!(breakdown.tax, Money::from_major(20));
        assert_eq!(breakdown.total, Money::from_major(220));
    }

    #[test]
    fn coupon_capped_at_subtotal() {
        let calc = PricingCalculator::with_default_policy();
        let mut inp = input(Money::from_major(30));
        inp.coupon_discount = Money::from_major(50);

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.discount, Money::from_major(30));
        assert_eq!(breakdown.total, Money::ZERO);
    }

    #[test]
    fn points_capped_at_remaining_subtotal() {
        // 10 after the coupon; 5000 points are worth 50 but only 10 fits.
        let calc = PricingCalculator::with_default_policy();
        let mut inp = input(Money::from_major(20));
        inp.coupon_discount = Money::from_major(10);
        inp.points_requested = Points::new(5000);

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.points_discount, Money::from_major(10));
        assert_eq!(breakdown.points_used, Points::new(1000));
        assert_eq!(breakdown.total, Money::ZERO);
    }

    #[test]
    fn zero_points_requested_consumes_nothing() {
        let calc = PricingCalculator::with_default_policy();
        let breakdown = calc.compute(&input(Money::from_major(50)));
        assert_eq!(breakdown.points_used, Points::ZERO);
        assert_eq!(breakdown.points_discount, Money::ZERO);
    }

    #[test]
    fn total_never_negative() {
        let mut policy = PricingPolicy::default();
        policy.tax_rate = Decimal::ZERO;
        let calc = PricingCalculator::new(policy);

        let mut inp = input(Money::from_major(10));
        inp.coupon_discount = Money::from_major(10);
        inp.points_requested = Points::new(10_000);

        let breakdown = calc.compute(&inp);
        assert_eq!(breakdown.total, Money::ZERO);
        assert!(breakdown.is_consistent());
    }

    use rust_decimal::Decimal;

    proptest! {
        #[test]
        fn breakdown_identity_holds(
            subtotal_cents in 0i64..10_000_000,
            coupon_cents in 0i64..1_000_000,
            points in 0u64..1_000_000,
            tax_bps in 0u32..3000,
        ) {
            let mut policy = PricingPolicy::default();
            policy.tax_rate = Decimal::new(i64::from(tax_bps), 4);
            let calc = PricingCalculator::new(policy);

            let inp = PricingInput {
                subtotal: Money::from_cents(subtotal_cents),
                shipping_method: ShippingMethod::Standard,
                destination_country: "KE".to_string(),
                all_digital: false,
                coupon_discount: Money::from_cents(coupon_cents),
                points_requested: Points::new(points),
            };
            let b = calc.compute(&inp);

            prop_assert!(b.is_consistent());
            prop_assert!(!b.total.is_negative());
            prop_assert!(b.discount <= b.subtotal);
            prop_assert!(b.points_discount <= b.subtotal - b.discount);
            // Consumed points never exceed what was requested.
            prop_assert!(b.points_used <= Points::new(points));
        }
    }
}
