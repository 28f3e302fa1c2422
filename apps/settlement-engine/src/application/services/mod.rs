//! Application Services
//!
//! The operations the engine exposes to the request layer. Each call is
//! one unit of work against the settlement store.

mod cart_service;
mod order_service;
mod payout_service;
mod points_service;
mod referral_service;

pub use cart_service::CartService;
pub use order_service::{CheckoutInput, OrderService, PaymentOutcome, PaymentWebhook};
pub use payout_service::PayoutService;
pub use points_service::PointsService;
pub use referral_service::ReferralService;
