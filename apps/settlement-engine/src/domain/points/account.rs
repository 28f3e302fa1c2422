//! The per-user points account.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::{Points, Timestamp, UserId};

/// Spend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointsError {
    /// The balance does not cover the requested spend.
    #[error("insufficient points: requested {requested}, balance {balance}")]
    InsufficientPoints {
        /// Points requested.
        requested: Points,
        /// Current balance.
        balance: Points,
    },
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsEntryKind {
    /// Points credited (purchases, bonuses, referrals).
    Earned,
    /// Points consumed at checkout.
    Spent,
    /// Points returned after a cancellation.
    Refunded,
}

/// One append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsEntry {
    /// Credit or debit.
    pub kind: PointsEntryKind,
    /// Points moved.
    pub points: Points,
    /// Why the entry exists (e.g. "order delivered", "signup bonus").
    pub reason: String,
    /// When the entry was recorded.
    pub at: Timestamp,
}

/// A user's loyalty points account.
///
/// Invariant: `balance = total_earned - total_spent` and the balance is
/// never negative. Refunds are credits and count toward `total_earned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAccount {
    user_id: UserId,
    balance: Points,
    total_earned: Points,
    total_spent: Points,
    entries: Vec<PointsEntry>,
}

impl PointsAccount {
    /// Open an empty account for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: Points::ZERO,
            total_earned: Points::ZERO,
            total_spent: Points::ZERO,
            entries: Vec::new(),
        }
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Current spendable balance.
    #[must_use]
    pub const fn balance(&self) -> Points {
        self.balance
    }

    /// Lifetime points credited.
    #[must_use]
    pub const fn total_earned(&self) -> Points {
        self.total_earned
    }

    /// Lifetime points spent.
    #[must_use]
    pub const fn total_spent(&self) -> Points {
        self.total_spent
    }

    /// The append-only entry log, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[PointsEntry] {
        &self.entries
    }

    /// Credit points.
    pub fn earn(&mut self, points: Points, reason: impl Into<String>, now: Timestamp) {
        if points.is_zero() {
            return;
        }
        self.total_earned += points;
        self.balance += points;
        self.entries.push(PointsEntry {
            kind: PointsEntryKind::Earned,
            points,
            reason: reason.into(),
            at: now,
        });
    }

    /// Debit points.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::InsufficientPoints`] when the balance does
    /// not cover the spend; the account is left unchanged.
    pub fn spend(&mut self, points: Points, now: Timestamp) -> Result<(), PointsError> {
        if points > self.balance {
            return Err(PointsError::InsufficientPoints {
                requested: points,
                balance: self.balance,
            });
        }
        if points.is_zero() {
            return Ok(());
        }
        self.balance -= points;
        self.total_spent += points;
        self.entries.push(PointsEntry {
            kind: PointsEntryKind::Spent,
            points,
            reason: "order checkout".to_string(),
            at: now,
        });
        Ok(())
    }

    /// Return points spent on an order that was cancelled.
    pub fn refund(&mut self, points: Points, reason: impl Into<String>, now: Timestamp) {
        if points.is_zero() {
            return;
        }
        self.total_earned += points;
        self.balance += points;
        self.entries.push(PointsEntry {
            kind: PointsEntryKind::Refunded,
            points,
            reason: reason.into(),
            at: now,
        });
    }

    /// Check the account invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.balance == self.total_earned - self.total_spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::parse("2026-06-15T12:00:00Z").unwrap()
    }

    fn account() -> PointsAccount {
        PointsAccount::new(UserId::new("usr-1"))
    }

    #[test]
    fn new_account_is_zeroed() {
        let a = account();
        assert_eq!(a.balance(), Points::ZERO);
        assert!(a.is_consistent());
    }

    #[test]
    fn earn_credits_balance_and_lifetime() {
        let mut a = account();
        a.earn(Points::new(100), "signup bonus", now());

        assert_eq!(a.balance(), Points::new(100));
        assert_eq!(a.total_earned(), Points::new(100));
        assert_eq!(a.entries().len(), 1);
        assert!(a.is_consistent());
    }

    #[test]
    fn spend_debits_balance() {
        let mut a = account();
        a.earn(Points::new(100), "signup bonus", now());
        a.spend(Points::new(40), now()).unwrap();

        assert_eq!(a.balance(), Points::new(60));
        assert_eq!(a.total_spent(), Points::new(40));
        assert!(a.is_consistent());
    }

    #[test]
    fn overspend_rejected_and_balance_unchanged() {
        let mut a = account();
        a.earn(Points::new(30), "signup bonus", now());

        let result = a.spend(Points::new(50), now());
        assert_eq!(
            result,
            Err(PointsError::InsufficientPoints {
                requested: Points::new(50),
                balance: Points::new(30),
            })
        );
        assert_eq!(a.balance(), Points::new(30));
        assert!(a.is_consistent());
    }

    #[test]
    fn refund_restores_balance() {
        let mut a = account();
        a.earn(Points::new(100), "signup bonus", now());
        a.spend(Points::new(100), now()).unwrap();
        a.refund(Points::new(100), "order cancelled", now());

        assert_eq!(a.balance(), Points::new(100));
        assert!(a.is_consistent());
    }

    #[test]
    fn zero_moves_record_no_entries() {
        let mut a = account();
        a.earn(Points::ZERO, "noop", now());
        a.spend(Points::ZERO, now()).unwrap();
        a.refund(Points::ZERO, "noop", now());
        assert!(a.entries().is_empty());
    }

    #[test]
    fn invariant_holds_across_operations() {
        let mut a = account();
        a.earn(Points::new(500), "referral", now());
        a.spend(Points::new(120), now()).unwrap();
        a.earn(Points::new(10), "order delivered", now());
        a.refund(Points::new(120), "order cancelled", now());

        assert_eq!(a.balance(), Points::new(510));
        assert!(a.is_consistent());
    }
}
