//! Stateless coupon validation.

use thiserror::Error;

use super::definition::Coupon;
use crate::domain::shared::{Money, Timestamp};

/// Why a coupon was rejected.
///
/// Each variant is specific enough for the caller to show actionable
/// feedback instead of a generic "invalid coupon".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouponRejection {
    /// The coupon has been deactivated.
    #[error("coupon is not active")]
    Inactive,

    /// The validity window has not opened yet.
    #[error("coupon is not valid until {valid_from}")]
    NotYetValid {
        /// Start of the validity window.
        valid_from: Timestamp,
    },

    /// The validity window has closed.
    #[error("coupon expired at {valid_until}")]
    Expired {
        /// End of the validity window.
        valid_until: Timestamp,
    },

    /// The global redemption limit is exhausted.
    #[error("coupon usage limit of {limit} reached")]
    UsageLimitReached {
        /// The global limit.
        limit: u32,
    },

    /// This user has redeemed the coupon as often as allowed.
    #[error("per-user usage limit of {limit} reached")]
    UserLimitReached {
        /// The per-user limit.
        limit: u32,
    },

    /// The order is too small for the coupon.
    #[error("order amount {actual} is below the coupon minimum {minimum}")]
    MinimumNotMet {
        /// Required minimum order amount.
        minimum: Money,
        /// Actual order amount.
        actual: Money,
    },
}

/// Stateless rule evaluator for coupons.
///
/// Usage counts come from the caller's view of the usage ledger; the
/// validator itself reads nothing and writes nothing.
pub struct CouponValidator;

impl CouponValidator {
    /// Validate a coupon against an order amount and usage history.
    ///
    /// Checks run in a fixed order: active flag, validity window, global
    /// usage limit, per-user usage limit, minimum order amount.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`CouponRejection`].
    pub fn validate(
        coupon: &Coupon,
        order_amount: Money,
        global_uses: u32,
        user_uses: u32,
        now: Timestamp,
    ) -> Result<Money, CouponRejection> {
        if !coupon.is_active {
            return Err(CouponRejection::Inactive);
        }
        if now.is_before(coupon.valid_from) {
            return Err(CouponRejection::NotYetValid {
                valid_from: coupon.valid_from,
            });
        }
        if let Some(valid_until) = coupon.valid_until {
            if valid_until.is_before(now) {
                return Err(CouponRejection::Expired { valid_until });
            }
        }
        if let Some(limit) = coupon.usage_limit {
            if global_uses >= limit {
                return Err(CouponRejection::UsageLimitReached { limit });
            }
        }
        if let Some(limit) = coupon.usage_limit_per_user {
            if user_uses >= limit {
                return Err(CouponRejection::UserLimitReached { limit });
            }
        }
        if let Some(minimum) = coupon.minimum_order_amount {
            if order_amount < minimum {
                return Err(CouponRejection::MinimumNotMet {
                    minimum,
                    actual: order_amount,
                });
            }
        }
        Ok(coupon.discount_for(order_amount))
    }
}
