//! The settlement store: one unit of work over all engine state.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::cart::Cart;
use crate::domain::coupon::{Coupon, CouponUsage};
use crate::domain::inventory::InventoryLedger;
use crate::domain::merchant::{Merchant, MerchantReferral, Payout, ReferralStatus};
use crate::domain::order::Order;
use crate::domain::points::PointsAccount;
use crate::domain::shared::{
    CouponCode, CouponId, MerchantId, Money, OrderId, OrderNumber, PaymentId, PayoutId,
    ReferralId, ReferralToken, Timestamp, UserId,
};

/// All engine state, as one cloneable value.
///
/// The relational layout of the original schema maps onto these
/// collections one to one. Secondary indexes (order numbers, payment and
/// token lookups, merchant codes) are maintained by the services that
/// insert into them.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// One draft cart per user.
    pub carts: HashMap<UserId, Cart>,
    /// Orders by id.
    pub orders: HashMap<OrderId, Order>,
    /// Issued order numbers, for uniqueness checks.
    pub order_numbers: HashMap<OrderNumber, OrderId>,
    /// Payment id to owning order.
    pub payments_index: HashMap<PaymentId, OrderId>,
    /// Coupons by normalized code.
    pub coupons: HashMap<CouponCode, Coupon>,
    /// Append-only coupon redemption ledger.
    pub coupon_usage: Vec<CouponUsage>,
    /// The stock ledger.
    pub inventory: InventoryLedger,
    /// Points accounts by user.
    pub points: HashMap<UserId, PointsAccount>,
    /// Merchants by id.
    pub merchants: HashMap<MerchantId, Merchant>,
    /// Referral code to merchant.
    pub merchant_codes: HashMap<String, MerchantId>,
    /// Referrals by id.
    pub referrals: HashMap<ReferralId, MerchantReferral>,
    /// Referral token to referral.
    pub referral_tokens: HashMap<ReferralToken, ReferralId>,
    /// Payouts by id.
    pub payouts: HashMap<PayoutId, Payout>,
}

impl StoreState {
    /// The user's points account, created on first touch.
    pub fn points_account_mut(&mut self, user_id: &UserId) -> &mut PointsAccount {
        self.points
            .entry(user_id.clone())
            .or_insert_with(|| PointsAccount::new(user_id.clone()))
    }

    /// Global redemption count for a coupon.
    #[must_use]
    pub fn coupon_uses(&self, coupon_id: &CouponId) -> u32 {
        u32::try_from(
            self.coupon_usage
                .iter()
                .filter(|u| &u.coupon_id == coupon_id)
                .count(),
        )
        .unwrap_or(u32::MAX)
    }

    /// Redemption count for a coupon by one user.
    #[must_use]
    pub fn coupon_uses_by(&self, coupon_id: &CouponId, user_id: &UserId) -> u32 {
        u32::try_from(
            self.coupon_usage
                .iter()
                .filter(|u| &u.coupon_id == coupon_id && &u.user_id == user_id)
                .count(),
        )
        .unwrap_or(u32::MAX)
    }

    /// Sum of completed payout amounts for a merchant.
    #[must_use]
    pub fn completed_payouts_for(&self, merchant_id: &MerchantId) -> Money {
        self.payouts
            .values()
            .filter(|p| p.merchant_id() == merchant_id && p.is_completed())
            .map(Payout::amount)
            .sum()
    }

    /// The single pending, unexpired referral attributable to a user.
    #[must_use]
    pub fn pending_referral_for(&self, user_id: &UserId, now: Timestamp) -> Option<&ReferralId> {
        self.referrals
            .values()
            .find(|r| r.is_attributable_to(user_id, now))
            .map(MerchantReferral::id)
    }

    /// Pending referrals whose attribution window has closed.
    #[must_use]
    pub fn stale_referrals(&self, now: Timestamp) -> Vec<ReferralId> {
        self.referrals
            .values()
            .filter(|r| r.status() == ReferralStatus::Pending && r.is_expired(now))
            .map(|r| r.id().clone())
            .collect()
    }
}

/// Shared store with an explicit unit-of-work boundary.
///
/// `commit` runs a command against a cloned draft of the state and swaps
/// the draft in only when the command succeeds. A failing command leaves
/// the store exactly as it was, so multi-ledger mutations are all or
/// nothing. Commits serialize on the write lock; readers see only
/// committed state.
#[derive(Debug, Default)]
pub struct SettlementStore {
    state: RwLock<StoreState>,
}

impl SettlementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing state.
    #[must_use]
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Run a read-only query against committed state.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a command as one unit of work.
    ///
    /// The command mutates a draft; the draft becomes visible only if the
    /// command returns `Ok`.
    ///
    /// # Errors
    ///
    /// Propagates the command's error unchanged, with no state applied.
    pub fn commit<T, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<T, E>) -> Result<T, E> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        *guard = draft;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::points::PointsError;
    use crate::domain::shared::Points;

    fn now() -> Timestamp {
        Timestamp::parse("2026-06-15T12:00:00Z").unwrap()
    }

    #[test]
    fn commit_applies_on_success() {
        let store = SettlementStore::new();
        store
            .commit(|state| -> Result<(), PointsError> {
                state
                    .points_account_mut(&UserId::new("usr-1"))
                    .earn(Points::new(100), "signup bonus", now());
                Ok(())
            })
            .unwrap();

        let balance = store.read(|s| s.points[&UserId::new("usr-1")].balance());
        assert_eq!(balance, Points::new(100));
    }

    #[test]
    fn failed_commit_leaves_no_trace() {
        let store = SettlementStore::new();
        store
            .commit(|state| -> Result<(), PointsError> {
                state
                    .points_account_mut(&UserId::new("usr-1"))
                    .earn(Points::new(30), "signup bonus", now());
                Ok(())
            })
            .unwrap();

        // Earn for one user, then fail: neither mutation survives.
        let result = store.commit(|state| {
            state
                .points_account_mut(&UserId::new("usr-2"))
                .earn(Points::new(500), "referral", now());
            state
                .points_account_mut(&UserId::new("usr-1"))
                .spend(Points::new(50), now())
        });

        assert!(matches!(
            result,
            Err(PointsError::InsufficientPoints { .. })
        ));
        store.read(|s| {
            assert_eq!(s.points[&UserId::new("usr-1")].balance(), Points::new(30));
            assert!(!s.points.contains_key(&UserId::new("usr-2")));
        });
    }

    #[test]
    fn reads_see_only_committed_state() {
        let store = SettlementStore::new();
        let _ = store.commit(|state| -> Result<(), ()> {
            state
                .points_account_mut(&UserId::new("usr-1"))
                .earn(Points::new(10), "bonus", now());
            Err(())
        });

        assert!(store.read(|s| s.points.is_empty()));
    }
}
