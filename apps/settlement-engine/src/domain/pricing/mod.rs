//! Pricing Bounded Context
//!
//! Pure price computation: shipping rate lookup, tax, coupon discount
//! capping, points discount, and the final breakdown. No side effects;
//! everything here is deterministic and independently testable.

mod calculator;
mod policy;
mod shipping;

pub use calculator::{PriceBreakdown, PricingCalculator, PricingInput};
pub use policy::PricingPolicy;
pub use shipping::{ShippingMethod, ShippingRate, ShippingRateTable};
