//! Top-level error taxonomy.
//!
//! Aggregates the per-context domain errors into the single error type
//! the application services return to the request layer.

use thiserror::Error;

use crate::application::ports::{CatalogError, EventPublishError};
use crate::domain::cart::CartError;
use crate::domain::coupon::CouponRejection;
use crate::domain::inventory::InventoryError;
use crate::domain::merchant::{PayoutError, ReferralError};
use crate::domain::points::PointsError;
use crate::domain::shared::DomainError;

/// Anything a settlement operation can fail with.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Malformed input; the caller's fault, never retried.
    #[error("validation error: {message}")]
    Validation {
        /// What was wrong.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type.
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Business-rule or state-machine violation from the domain.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Cart mutation failure.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Stock could not be reserved.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Points balance could not cover a spend.
    #[error(transparent)]
    Points(#[from] PointsError),

    /// Coupon rejected, with the specific reason.
    #[error("invalid coupon: {0}")]
    Coupon(#[from] CouponRejection),

    /// Referral attribution failure (logged, rarely surfaced).
    #[error(transparent)]
    Referral(#[from] ReferralError),

    /// Payout request or transition failure.
    #[error(transparent)]
    Payout(#[from] PayoutError),

    /// Payment settlement failure; the order stays recoverable.
    #[error("payment processing error: {message}")]
    PaymentProcessing {
        /// What went wrong.
        message: String,
    },

    /// The external catalog could not be reached.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Event publishing failure.
    #[error(transparent)]
    EventPublish(#[from] EventPublishError),
}

impl SettlementError {
    /// Shorthand for a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a payment processing error.
    #[must_use]
    pub fn payment(message: impl Into<String>) -> Self {
        Self::PaymentProcessing {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Points;

    #[test]
    fn wraps_domain_errors() {
        let err: SettlementError = PointsError::InsufficientPoints {
            requested: Points::new(50),
            balance: Points::new(30),
        }
        .into();
        assert!(format!("{err}").contains("insufficient points"));
    }

    #[test]
    fn coupon_rejection_keeps_reason() {
        let err: SettlementError = CouponRejection::Inactive.into();
        assert_eq!(format!("{err}"), "invalid coupon: coupon is not active");
    }

    #[test]
    fn constructors() {
        assert!(matches!(
            SettlementError::validation("bad input"),
            SettlementError::Validation { .. }
        ));
        assert!(matches!(
            SettlementError::not_found("Order", "ord-1"),
            SettlementError::NotFound { .. }
        ));
    }
}
