//! Referral and payout policies.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Money;

/// Configurable referral-program parameters.
///
/// The commission rate and points are defaults for new merchants; each
/// referral freezes the merchant's values at click time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralPolicy {
    /// Days a referral stays attributable after the click.
    pub expiry_days: i64,
    /// Points credited to the merchant's user on each conversion.
    pub default_points_per_referral: u64,
    /// Commission rate for new merchants.
    pub default_commission_rate: Decimal,
}

impl Default for ReferralPolicy {
    fn default() -> Self {
        Self {
            expiry_days: 30,
            default_points_per_referral: 500,
            default_commission_rate: dec!(0.05),
        }
    }
}

/// Configurable payout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutPolicy {
    /// Minimum pending earnings before a payout may be requested.
    pub default_minimum: Money,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        Self {
            default_minimum: Money::from_major(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_program_terms() {
        let referral = ReferralPolicy::default();
        assert_eq!(referral.expiry_days, 30);
        assert_eq!(referral.default_points_per_referral, 500);
        assert_eq!(referral.default_commission_rate, dec!(0.05));

        let payout = PayoutPolicy::default();
        assert_eq!(payout.default_minimum, Money::from_major(100));
    }
}
