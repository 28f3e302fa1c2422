//! The referral funnel state machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ReferralError;
use super::merchant::Merchant;
use crate::domain::shared::{
    MerchantId, Money, OrderId, Points, ReferralId, ReferralToken, Timestamp, UserId,
};

/// Where a referral sits in the click → registration → purchase funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// Clicked; attributable until expiry.
    Pending,
    /// Converted on a first purchase. Terminal.
    Completed,
    /// Administratively cancelled. Terminal.
    Cancelled,
    /// Attribution window closed without a purchase. Terminal.
    Expired,
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// One tracked referral, from click to conversion or expiry.
///
/// The commission rate and points are frozen from the merchant at click
/// time; later rate changes never affect an existing referral. A
/// referral completes at most once, guarded by status and the 1:1 order
/// link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantReferral {
    id: ReferralId,
    merchant_id: MerchantId,
    token: ReferralToken,
    commission_rate: Decimal,
    points_per_referral: Points,
    status: ReferralStatus,
    referred_user: Option<UserId>,
    order_id: Option<OrderId>,
    clicked_at: Timestamp,
    registered_at: Option<Timestamp>,
    first_purchase_at: Option<Timestamp>,
    expires_at: Timestamp,
}

impl MerchantReferral {
    /// Record a click on a merchant's referral link.
    ///
    /// Freezes the merchant's current commission rate and points.
    #[must_use]
    pub fn track(merchant: &Merchant, now: Timestamp, expiry_days: i64) -> Self {
        Self {
            id: ReferralId::generate(),
            merchant_id: merchant.id().clone(),
            token: ReferralToken::generate(),
            commission_rate: merchant.commission_rate(),
            points_per_referral: merchant.points_per_referral(),
            status: ReferralStatus::Pending,
            referred_user: None,
            order_id: None,
            clicked_at: now,
            registered_at: None,
            first_purchase_at: None,
            expires_at: now.plus_days(expiry_days),
        }
    }

    /// Referral identifier.
    #[must_use]
    pub const fn id(&self) -> &ReferralId {
        &self.id
    }

    /// The merchant being credited.
    #[must_use]
    pub const fn merchant_id(&self) -> &MerchantId {
        &self.merchant_id
    }

    /// The link token handed back to the visitor.
    #[must_use]
    pub const fn token(&self) -> &ReferralToken {
        &self.token
    }

    /// Commission rate frozen at click time.
    #[must_use]
    pub const fn commission_rate(&self) -> Decimal {
        self.commission_rate
    }

    /// Points frozen at click time.
    #[must_use]
    pub const fn points_per_referral(&self) -> Points {
        self.points_per_referral
    }

    /// Current funnel status.
    #[must_use]
    pub const fn status(&self) -> ReferralStatus {
        self.status
    }

    /// The user who signed up through this referral.
    #[must_use]
    pub const fn referred_user(&self) -> Option<&UserId> {
        self.referred_user.as_ref()
    }

    /// The order that converted this referral.
    #[must_use]
    pub const fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// When the attributed user registered.
    #[must_use]
    pub const fn registered_at(&self) -> Option<Timestamp> {
        self.registered_at
    }

    /// When the first purchase converted this referral.
    #[must_use]
    pub const fn first_purchase_at(&self) -> Option<Timestamp> {
        self.first_purchase_at
    }

    /// End of the attribution window.
    #[must_use]
    pub const fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the attribution window has closed.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_before(now)
    }

    /// Whether this referral can still convert for the given user.
    #[must_use]
    pub fn is_attributable_to(&self, user_id: &UserId, now: Timestamp) -> bool {
        self.status == ReferralStatus::Pending
            && !self.is_expired(now)
            && self.referred_user.as_ref() == Some(user_id)
    }

    /// Attach the newly registered user.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralError::Expired`] or [`ReferralError::NotPending`]
    /// when the referral can no longer be attributed. Callers treat both
    /// as a silent no-op; attribution never blocks signup.
    pub fn register(&mut self, user_id: UserId, now: Timestamp) -> Result<(), ReferralError> {
        self.guard_pending(now)?;
        self.referred_user = Some(user_id);
        self.registered_at = Some(now);
        Ok(())
    }

    /// Convert on the referred user's first purchase.
    ///
    /// Returns the commission owed to the merchant. This is the only
    /// path to `Completed` and it runs at most once.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralError::AlreadyConverted`] when an order is
    /// already linked, [`ReferralError::Expired`] past the window, or
    /// [`ReferralError::NotPending`] for any other status.
    pub fn convert(
        &mut self,
        order_id: OrderId,
        order_total: Money,
        now: Timestamp,
    ) -> Result<Money, ReferralError> {
        if let Some(existing) = &self.order_id {
            return Err(ReferralError::AlreadyConverted {
                order_id: existing.clone(),
            });
        }
        self.guard_pending(now)?;
        let commission = (order_total * self.commission_rate).round();
        self.status = ReferralStatus::Completed;
        self.order_id = Some(order_id);
        self.first_purchase_at = Some(now);
        Ok(commission)
    }

    /// Mark a stale pending referral expired. Returns whether it changed.
    pub fn expire(&mut self, now: Timestamp) -> bool {
        if self.status == ReferralStatus::Pending && self.is_expired(now) {
            self.status = ReferralStatus::Expired;
            true
        } else {
            false
        }
    }

    /// Administrative cancellation of a pending referral.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralError::NotPending`] unless the referral is
    /// still pending.
    pub fn cancel(&mut self) -> Result<(), ReferralError> {
        if self.status != ReferralStatus::Pending {
            return Err(ReferralError::NotPending {
                status: self.status.to_string(),
            });
        }
        self.status = ReferralStatus::Cancelled;
        Ok(())
    }

    fn guard_pending(&self, now: Timestamp) -> Result<(), ReferralError> {
        if self.status != ReferralStatus::Pending {
            return Err(ReferralError::NotPending {
                status: self.status.to_string(),
            });
        }
        if self.is_expired(now) {
            return Err(ReferralError::Expired {
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merchant::NewMerchantParams;
    use rust_decimal_macros::dec;

    fn t(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn merchant() -> Merchant {
        let mut m = Merchant::new(NewMerchantParams {
            user_id: UserId::new("usr-m1"),
            business_name: "Savanna Goods".to_string(),
            referral_code: "SAVANNA".to_string(),
            commission_rate: dec!(0.05),
            points_per_referral: Points::new(500),
            minimum_payout: Money::from_major(100),
            now: t("2026-01-01T00:00:00Z"),
        });
        m.approve();
        m
    }

    fn referral() -> MerchantReferral {
        MerchantReferral::track(&merchant(), t("2026-06-01T00:00:00Z"), 30)
    }

    #[test]
    fn track_freezes_merchant_terms() {
        let mut m = merchant();
        let r = MerchantReferral::track(&m, t("2026-06-01T00:00:00Z"), 30);

        assert_eq!(r.status(), ReferralStatus::Pending);
        assert_eq!(r.commission_rate(), dec!(0.05));
        assert_eq!(r.expires_at(), t("2026-07-01T00:00:00Z"));

        // A later rate change does not touch the referral.
        m.set_commission_rate(dec!(0.10));
        assert_eq!(r.commission_rate(), dec!(0.05));
    }

    #[test]
    fn register_attaches_user() {
        let mut r = referral();
        r.register(UserId::new("usr-9"), t("2026-06-02T00:00:00Z"))
            .unwrap();

        assert_eq!(r.referred_user(), Some(&UserId::new("usr-9")));
        assert_eq!(r.registered_at(), Some(t("2026-06-02T00:00:00Z")));
        assert_eq!(r.status(), ReferralStatus::Pending);
    }

    #[test]
    fn register_after_expiry_rejected() {
        let mut r = referral();
        let result = r.register(UserId::new("usr-9"), t("2026-08-01T00:00:00Z"));
        assert!(matches!(result, Err(ReferralError::Expired { .. })));
        assert!(r.referred_user().is_none());
    }

    #[test]
    fn convert_computes_frozen_commission() {
        let mut r = referral();
        r.register(UserId::new("usr-9"), t("2026-06-02T00:00:00Z"))
            .unwrap();

        let commission = r
            .convert(
                OrderId::new("ord-1"),
                Money::from_major(1000),
                t("2026-06-10T00:00:00Z"),
            )
            .unwrap();

        assert_eq!(commission, Money::from_major(50));
        assert_eq!(r.status(), ReferralStatus::Completed);
        assert_eq!(r.order_id(), Some(&OrderId::new("ord-1")));
        assert_eq!(r.first_purchase_at(), Some(t("2026-06-10T00:00:00Z")));
    }

    #[test]
    fn convert_twice_rejected() {
        let mut r = referral();
        r.register(UserId::new("usr-9"), t("2026-06-02T00:00:00Z"))
            .unwrap();
        r.convert(
            OrderId::new("ord-1"),
            Money::from_major(1000),
            t("2026-06-10T00:00:00Z"),
        )
        .unwrap();

        let second = r.convert(
            OrderId::new("ord-1"),
            Money::from_major(1000),
            t("2026-06-11T00:00:00Z"),
        );
        assert!(matches!(second, Err(ReferralError::AlreadyConverted { .. })));
        assert_eq!(r.first_purchase_at(), Some(t("2026-06-10T00:00:00Z")));
    }

    #[test]
    fn expired_referral_never_converts() {
        let mut r = referral();
        r.register(UserId::new("usr-9"), t("2026-06-02T00:00:00Z"))
            .unwrap();

        let result = r.convert(
            OrderId::new("ord-1"),
            Money::from_major(1000),
            t("2026-07-02T00:00:01Z"),
        );
        assert!(matches!(result, Err(ReferralError::Expired { .. })));
        assert_eq!(r.status(), ReferralStatus::Pending);
    }

    #[test]
    fn expire_sweep_is_guarded_and_idempotent() {
        let mut r = referral();
        assert!(!r.expire(t("2026-06-15T00:00:00Z")));

        assert!(r.expire(t("2026-08-01T00:00:00Z")));
        assert_eq!(r.status(), ReferralStatus::Expired);
        assert!(!r.expire(t("2026-08-02T00:00:00Z")));
    }

    #[test]
    fn cancel_only_from_pending() {
        let mut r = referral();
        r.cancel().unwrap();
        assert_eq!(r.status(), ReferralStatus::Cancelled);
        assert!(r.cancel().is_err());
    }

    #[test]
    fn attributable_requires_matching_user() {
        let mut r = referral();
        r.register(UserId::new("usr-9"), t("2026-06-02T00:00:00Z"))
            .unwrap();

        let now = t("2026-06-10T00:00:00Z");
        assert!(r.is_attributable_to(&UserId::new("usr-9"), now));
        assert!(!r.is_attributable_to(&UserId::new("usr-8"), now));
        assert!(!r.is_attributable_to(&UserId::new("usr-9"), t("2026-08-01T00:00:00Z")));
    }
}
