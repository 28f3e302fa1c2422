//! The payment entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::PaymentStatus;
use crate::domain::shared::{DomainError, Money, OrderId, PaymentId, Timestamp};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card via the payment gateway.
    Card,
    /// Mobile money (e.g. M-Pesa).
    MobileMoney,
    /// Bank transfer.
    BankTransfer,
    /// Cash on delivery.
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Card => "card",
            Self::MobileMoney => "mobile_money",
            Self::BankTransfer => "bank_transfer",
            Self::CashOnDelivery => "cash_on_delivery",
        };
        write!(f, "{s}")
    }
}

/// One payment attempt against an order.
///
/// An order may carry several payments (retries, partial payments).
/// A completed payment is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    external_reference: Option<String>,
    failure_reason: Option<String>,
    created_at: Timestamp,
    settled_at: Option<Timestamp>,
}

impl Payment {
    /// Open a pending payment against an order.
    #[must_use]
    pub fn new(order_id: OrderId, amount: Money, method: PaymentMethod, now: Timestamp) -> Self {
        Self {
            id: PaymentId::generate(),
            order_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            external_reference: None,
            failure_reason: None,
            created_at: now,
            settled_at: None,
        }
    }

    /// Payment identifier.
    #[must_use]
    pub const fn id(&self) -> &PaymentId {
        &self.id
    }

    /// The order this payment belongs to.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Amount of this attempt.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Payment method.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Gateway reference, set on settlement.
    #[must_use]
    pub fn external_reference(&self) -> Option<&str> {
        self.external_reference.as_deref()
    }

    /// Gateway failure reason, set when the payment failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// When the gateway settled (completed or failed) the payment.
    #[must_use]
    pub const fn settled_at(&self) -> Option<Timestamp> {
        self.settled_at
    }

    /// Whether this payment counts toward the order being paid.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Mark the payment completed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] unless the payment
    /// is still pending.
    pub fn complete(
        &mut self,
        external_reference: Option<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.guard_pending(PaymentStatus::Completed)?;
        self.status = PaymentStatus::Completed;
        self.external_reference = external_reference;
        self.settled_at = Some(now);
        Ok(())
    }

    /// Mark the payment failed, keeping the gateway's reason.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] unless the payment
    /// is still pending.
    pub fn fail(&mut self, reason: Option<String>, now: Timestamp) -> Result<(), DomainError> {
        self.guard_pending(PaymentStatus::Failed)?;
        self.status = PaymentStatus::Failed;
        self.failure_reason = reason;
        self.settled_at = Some(now);
        Ok(())
    }

    fn guard_pending(&self, to: PaymentStatus) -> Result<(), DomainError> {
        if self.status == PaymentStatus::Pending {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                entity: "Payment".to_string(),
                from: self.status.to_string(),
                to: to.to_string(),
                reason: "only a pending payment can be settled".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::parse("2026-06-15T12:00:00Z").unwrap()
    }

    fn payment() -> Payment {
        Payment::new(
            OrderId::new("ord-1"),
            Money::from_major(100),
            PaymentMethod::MobileMoney,
            now(),
        )
    }

    #[test]
    fn new_payment_is_pending() {
        let p = payment();
        assert_eq!(p.status(), PaymentStatus::Pending);
        assert!(!p.is_completed());
        assert!(p.settled_at().is_none());
    }

    #[test]
    fn complete_stamps_reference_and_time() {
        let mut p = payment();
        p.complete(Some("mpesa-TX123".to_string()), now()).unwrap();

        assert!(p.is_completed());
        assert_eq!(p.external_reference(), Some("mpesa-TX123"));
        assert_eq!(p.settled_at(), Some(now()));
    }

    #[test]
    fn fail_keeps_reason() {
        let mut p = payment();
        p.fail(Some("insufficient funds".to_string()), now()).unwrap();

        assert_eq!(p.status(), PaymentStatus::Failed);
        assert_eq!(p.failure_reason(), Some("insufficient funds"));
    }

    #[test]
    fn completed_payment_is_immutable() {
        let mut p = payment();
        p.complete(None, now()).unwrap();

        assert!(p.complete(None, now()).is_err());
        assert!(p.fail(None, now()).is_err());
        assert!(p.is_completed());
    }

    #[test]
    fn failed_payment_cannot_complete() {
        let mut p = payment();
        p.fail(None, now()).unwrap();
        assert!(p.complete(None, now()).is_err());
    }
}
