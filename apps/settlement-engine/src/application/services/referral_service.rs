//! Referral service: the click → registration → conversion funnel.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::EventPublisherPort;
use crate::domain::events::SettlementEvent;
use crate::domain::merchant::{MerchantReferral, ReferralError, ReferralPolicy};
use crate::domain::shared::{Money, OrderId, ReferralToken, Timestamp, UserId};
use crate::error::SettlementError;
use crate::infrastructure::persistence::{SettlementStore, StoreState};

/// Attribute one order's delivery to the buyer's pending referral.
///
/// Exactly-once: an order that already converted a referral, or a user
/// with no attributable referral, converts nothing. On success the
/// merchant's earnings and the merchant user's points are credited in
/// the same draft as the caller's other mutations.
pub(crate) fn convert_referral(
    state: &mut StoreState,
    order_id: &OrderId,
    now: Timestamp,
) -> Result<Option<SettlementEvent>, ReferralError> {
    let Some(order) = state.orders.get(order_id) else {
        return Ok(None);
    };
    let user_id = order.user_id().clone();
    let order_total = order.total();

    if let Some(existing) = state
        .referrals
        .values()
        .find(|r| r.order_id() == Some(order_id))
    {
        return Err(ReferralError::AlreadyConverted {
            order_id: existing
                .order_id()
                .cloned()
                .unwrap_or_else(|| order_id.clone()),
        });
    }

    let Some(referral_id) = state.pending_referral_for(&user_id, now).cloned() else {
        return Ok(None);
    };
    let Some(referral) = state.referrals.get_mut(&referral_id) else {
        return Ok(None);
    };

    let commission = referral.convert(order_id.clone(), order_total, now)?;
    let merchant_id = referral.merchant_id().clone();
    let points = referral.points_per_referral();

    let Some(merchant) = state.merchants.get_mut(&merchant_id) else {
        return Ok(None);
    };
    merchant.record_conversion(commission, points);
    let merchant_user = merchant.user_id().clone();
    state
        .points_account_mut(&merchant_user)
        .earn(points, "referral conversion", now);

    Ok(Some(SettlementEvent::ReferralConverted {
        referral_id,
        merchant_id,
        order_id: order_id.clone(),
        commission,
        at: now,
    }))
}

/// Drives referral attribution.
pub struct ReferralService {
    store: Arc<SettlementStore>,
    events: Arc<dyn EventPublisherPort>,
    policy: ReferralPolicy,
}

impl ReferralService {
    /// Create the service.
    #[must_use]
    pub fn new(
        store: Arc<SettlementStore>,
        events: Arc<dyn EventPublisherPort>,
        policy: ReferralPolicy,
    ) -> Self {
        Self {
            store,
            events,
            policy,
        }
    }

    /// Record a click on a merchant's referral link.
    ///
    /// Freezes the merchant's current commission terms onto a fresh
    /// pending referral and counts the attempt.
    ///
    /// # Errors
    ///
    /// Fails when the code is unknown or the merchant is not approved
    /// and active.
    pub async fn track_click(&self, referral_code: &str) -> Result<ReferralToken, SettlementError> {
        let now = Timestamp::now();
        let expiry_days = self.policy.expiry_days;
        let token = self.store.commit(move |state| {
            let merchant_id = state
                .merchant_codes
                .get(referral_code)
                .cloned()
                .ok_or_else(|| SettlementError::not_found("Merchant", referral_code))?;
            let merchant = state
                .merchants
                .get_mut(&merchant_id)
                .ok_or_else(|| SettlementError::not_found("Merchant", &merchant_id))?;
            if !merchant.can_refer() {
                return Err(ReferralError::MerchantNotEligible { merchant_id }.into());
            }

            let referral = MerchantReferral::track(merchant, now, expiry_days);
            merchant.record_click();
            let token = referral.token().clone();
            state
                .referral_tokens
                .insert(token.clone(), referral.id().clone());
            state.referrals.insert(referral.id().clone(), referral);
            Ok::<_, SettlementError>(token)
        })?;

        info!(code = referral_code, "referral click tracked");
        Ok(token)
    }

    /// Attach a newly registered user to their referral.
    ///
    /// Unknown, expired, or already-settled tokens are a silent no-op;
    /// attribution must never block signup.
    pub async fn attribute_registration(
        &self,
        token: &ReferralToken,
        new_user_id: &UserId,
    ) -> Result<(), SettlementError> {
        let now = Timestamp::now();
        let outcome = self.store.commit(|state| {
            let Some(referral_id) = state.referral_tokens.get(token).cloned() else {
                return Ok::<_, SettlementError>(None);
            };
            let Some(referral) = state.referrals.get_mut(&referral_id) else {
                return Ok(None);
            };
            Ok(Some(referral.register(new_user_id.clone(), now)))
        })?;

        match outcome {
            Some(Ok(())) => info!(user = %new_user_id, "referral registration attributed"),
            Some(Err(reason)) => {
                warn!(user = %new_user_id, %reason, "referral registration ignored");
            }
            None => warn!(user = %new_user_id, "unknown referral token ignored"),
        }
        Ok(())
    }

    /// Convert the buyer's pending referral on a delivered order.
    ///
    /// Returns the commission credited, or `None` when there was nothing
    /// to convert. Re-processing the same order is a logged no-op.
    pub async fn attribute_first_purchase(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Money>, SettlementError> {
        let now = Timestamp::now();
        let event = self.store.commit(|state| {
            match convert_referral(state, order_id, now) {
                Ok(event) => Ok::<_, SettlementError>(event),
                Err(reason) => {
                    warn!(order = %order_id, %reason, "referral conversion skipped");
                    Ok(None)
                }
            }
        })?;

        let Some(event) = event else {
            return Ok(None);
        };
        let commission = match &event {
            SettlementEvent::ReferralConverted { commission, .. } => *commission,
            _ => Money::ZERO,
        };
        if let Err(publish_err) = self.events.publish_event(event).await {
            warn!(%publish_err, "referral event publish failed");
        }
        info!(order = %order_id, %commission, "referral converted");
        Ok(Some(commission))
    }

    /// Mark stale pending referrals expired. Returns how many changed.
    pub async fn sweep_expired(&self) -> Result<usize, SettlementError> {
        let now = Timestamp::now();
        let expired = self.store.commit(move |state| {
            let stale = state.stale_referrals(now);
            let mut count = 0;
            for id in &stale {
                if let Some(referral) = state.referrals.get_mut(id) {
                    if referral.expire(now) {
                        count += 1;
                    }
                }
            }
            Ok::<_, SettlementError>(count)
        })?;

        if expired > 0 {
            info!(expired, "stale referrals expired");
        }
        Ok(expired)
    }
}
