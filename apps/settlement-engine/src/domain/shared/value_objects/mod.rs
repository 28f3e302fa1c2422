//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod points;
mod timestamp;

pub use identifiers::{
    CartId, CouponCode, CouponId, MerchantId, OrderId, OrderNumber, PaymentId, PayoutId,
    ProductId, ReferralId, ReferralToken, UserId, VariantId,
};
pub use money::Money;
pub use points::Points;
pub use timestamp::Timestamp;
