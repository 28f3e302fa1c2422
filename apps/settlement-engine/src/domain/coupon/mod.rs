//! Coupon Bounded Context
//!
//! Coupon definitions, the append-only usage ledger, and the stateless
//! validator that turns a coupon plus usage history into a discount or a
//! specific rejection reason.

mod definition;
mod validator;

pub use definition::{Coupon, CouponUsage, DiscountKind};
pub use validator::{CouponRejection, CouponValidator};
