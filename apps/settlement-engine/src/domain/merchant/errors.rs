//! Referral and payout errors.

use thiserror::Error;

use crate::domain::shared::{MerchantId, Money, OrderId, Timestamp};

/// Referral attribution failures.
///
/// These are logged rather than surfaced to buyers; attribution is a
/// best-effort side effect of delivery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferralError {
    /// The merchant cannot accept referrals.
    #[error("merchant {merchant_id} is not approved and active")]
    MerchantNotEligible {
        /// The ineligible merchant.
        merchant_id: MerchantId,
    },

    /// The attribution window has closed.
    #[error("referral expired at {expires_at}")]
    Expired {
        /// End of the attribution window.
        expires_at: Timestamp,
    },

    /// The referral already converted.
    #[error("referral already converted by order {order_id}")]
    AlreadyConverted {
        /// The order that converted it.
        order_id: OrderId,
    },

    /// The referral left the pending state some other way.
    #[error("referral is {status}, not pending")]
    NotPending {
        /// Current status.
        status: String,
    },
}

/// Payout failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayoutError {
    /// Pending earnings are below the merchant's minimum.
    #[error("pending earnings {pending} are below the minimum payout {minimum}")]
    BelowMinimum {
        /// Current pending earnings.
        pending: Money,
        /// The merchant's minimum payout.
        minimum: Money,
    },

    /// The requested amount exceeds pending earnings.
    #[error("requested {requested} exceeds pending earnings {pending}")]
    ExceedsPending {
        /// Amount requested.
        requested: Money,
        /// Current pending earnings.
        pending: Money,
    },

    /// The payout is not in a state that allows the move.
    #[error("invalid payout transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted status.
        to: String,
    },
}
