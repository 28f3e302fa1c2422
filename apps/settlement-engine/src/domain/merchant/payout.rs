//! The payout entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::PayoutError;
use crate::domain::shared::{MerchantId, Money, PayoutId, Timestamp};

/// Lifecycle status of a payout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// Requested, not yet picked up.
    Pending,
    /// Being executed by the payments team.
    Processing,
    /// Paid out; counts against pending earnings. Terminal.
    Completed,
    /// Execution failed; earnings remain re-requestable. Terminal.
    Failed,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One payout request against a merchant's pending earnings.
///
/// Only a completed payout reduces pending earnings; a failed one leaves
/// them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    id: PayoutId,
    merchant_id: MerchantId,
    amount: Money,
    status: PayoutStatus,
    failure_reason: Option<String>,
    requested_at: Timestamp,
    processed_at: Option<Timestamp>,
}

impl Payout {
    /// Open a pending payout request.
    #[must_use]
    pub fn request(merchant_id: MerchantId, amount: Money, now: Timestamp) -> Self {
        Self {
            id: PayoutId::generate(),
            merchant_id,
            amount,
            status: PayoutStatus::Pending,
            failure_reason: None,
            requested_at: now,
            processed_at: None,
        }
    }

    /// Payout identifier.
    #[must_use]
    pub const fn id(&self) -> &PayoutId {
        &self.id
    }

    /// The merchant being paid.
    #[must_use]
    pub const fn merchant_id(&self) -> &MerchantId {
        &self.merchant_id
    }

    /// Amount requested.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PayoutStatus {
        self.status
    }

    /// Why execution failed, when it did.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// When the payout reached a terminal state.
    #[must_use]
    pub const fn processed_at(&self) -> Option<Timestamp> {
        self.processed_at
    }

    /// Whether this payout counts against pending earnings.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PayoutStatus::Completed
    }

    /// Pick the payout up for execution.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::InvalidTransition`] unless pending.
    pub fn begin_processing(&mut self) -> Result<(), PayoutError> {
        self.guard(PayoutStatus::Pending, PayoutStatus::Processing)?;
        self.status = PayoutStatus::Processing;
        Ok(())
    }

    /// Mark the payout paid.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::InvalidTransition`] unless processing.
    pub fn complete(&mut self, now: Timestamp) -> Result<(), PayoutError> {
        self.guard(PayoutStatus::Processing, PayoutStatus::Completed)?;
        self.status = PayoutStatus::Completed;
        self.processed_at = Some(now);
        Ok(())
    }

    /// Mark the payout failed, keeping the reason.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::InvalidTransition`] unless processing.
    pub fn fail(&mut self, reason: Option<String>, now: Timestamp) -> Result<(), PayoutError> {
        self.guard(PayoutStatus::Processing, PayoutStatus::Failed)?;
        self.status = PayoutStatus::Failed;
        self.failure_reason = reason;
        self.processed_at = Some(now);
        Ok(())
    }

    fn guard(&self, expected: PayoutStatus, to: PayoutStatus) -> Result<(), PayoutError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(PayoutError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }
}
