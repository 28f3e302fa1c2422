// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Settlement Engine - Rust Core Library
//!
//! Commerce settlement engine for the CorePath platform: carts, orders,
//! pricing, loyalty points, coupons, merchant referrals, and payouts.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! The settlement engine follows Clean Architecture principles with Domain-Driven Design:
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `cart`: Mutable draft cart, the only mutable pre-order state
//!   - `order`: Immutable order aggregate, status and payment state machines
//!   - `pricing`: Price breakdown calculator, shipping rates
//!   - `coupon`: Coupon definitions and validation
//!   - `inventory`: Stock ledger with all-or-nothing reservation
//!   - `points`: Loyalty points accounts and policy
//!   - `merchant`: Merchants, referral attribution, payouts
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`CatalogPort`, `EventPublisherPort`)
//!   - `services`: `CartService`, `OrderService`, `PointsService`,
//!     `ReferralService`, `PayoutService`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: The settlement store (unit-of-work over engine state)
//!   - `catalog`: In-memory catalog adapter

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Engine-level error type.
pub mod error;

/// Tracing setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::cart::{Cart, CartSummary};
pub use domain::coupon::{Coupon, CouponRejection, CouponValidator, DiscountKind};
pub use domain::events::SettlementEvent;
pub use domain::merchant::{
    Merchant, MerchantReferral, MerchantStatus, NewMerchantParams, Payout, PayoutStatus,
    ReferralStatus,
};
pub use domain::order::{
    Address, Order, OrderLine, OrderStateMachine, OrderStatus, Payment, PaymentMethod,
    PaymentStatus,
};
pub use domain::points::{PointsAccount, PointsPolicy};
pub use domain::pricing::{PriceBreakdown, PricingCalculator, PricingPolicy, ShippingMethod};
pub use domain::shared::{
    CartId, CouponCode, CouponId, DomainError, MerchantId, Money, OrderId, OrderNumber, PaymentId,
    PayoutId, Points, ProductId, ReferralId, ReferralToken, Timestamp, UserId, VariantId,
};

// Application re-exports
pub use application::ports::{
    CatalogError, CatalogPort, EventPublishError, EventPublisherPort, NoOpEventPublisher,
    ResolvedItem,
};
pub use application::services::{
    CartService, CheckoutInput, OrderService, PaymentOutcome, PaymentWebhook, PayoutService,
    PointsService, ReferralService,
};

// Infrastructure re-exports
pub use config::{CommerceConfig, ConfigError, load_config};
pub use error::SettlementError;
pub use infrastructure::catalog::InMemoryCatalog;
pub use infrastructure::persistence::{SettlementStore, StoreState};
