//! Payout service: the merchant payout ledger.

use std::sync::Arc;

use tracing::info;

use crate::domain::merchant::{Payout, PayoutError, PayoutStatus};
use crate::domain::shared::{MerchantId, Money, PayoutId, Timestamp};
use crate::error::SettlementError;
use crate::infrastructure::persistence::{SettlementStore, StoreState};

/// Manages payout requests against merchants' pending earnings.
pub struct PayoutService {
    store: Arc<SettlementStore>,
}

impl PayoutService {
    /// Create the service.
    #[must_use]
    pub fn new(store: Arc<SettlementStore>) -> Self {
        Self { store }
    }

    /// Earnings the merchant could request right now.
    ///
    /// Completed payouts and in-flight requests both count against the
    /// merchant's total earnings.
    ///
    /// # Errors
    ///
    /// Fails for an unknown merchant.
    pub async fn available_earnings(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Money, SettlementError> {
        self.store.read(|state| {
            if !state.merchants.contains_key(merchant_id) {
                return Err(SettlementError::not_found("Merchant", merchant_id));
            }
            Ok(available_earnings(state, merchant_id))
        })
    }

    /// Open a payout request.
    ///
    /// `amount` defaults to everything available. The request must meet
    /// the merchant's minimum and cannot exceed what is available.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::BelowMinimum`] or
    /// [`PayoutError::ExceedsPending`] when the thresholds are violated.
    pub async fn request_payout(
        &self,
        merchant_id: &MerchantId,
        amount: Option<Money>,
    ) -> Result<Payout, SettlementError> {
        let now = Timestamp::now();
        let payout = self.store.commit(|state| {
            let merchant = state
                .merchants
                .get(merchant_id)
                .ok_or_else(|| SettlementError::not_found("Merchant", merchant_id))?;
            let minimum = merchant.minimum_payout();
            let available = available_earnings(state, merchant_id);

            if available < minimum {
                return Err(PayoutError::BelowMinimum {
                    pending: available,
                    minimum,
                }
                .into());
            }
            let amount = amount.unwrap_or(available);
            if amount > available {
                return Err(PayoutError::ExceedsPending {
                    requested: amount,
                    pending: available,
                }
                .into());
            }
            if amount < minimum {
                return Err(PayoutError::BelowMinimum {
                    pending: amount,
                    minimum,
                }
                .into());
            }

            let payout = Payout::request(merchant_id.clone(), amount, now);
            state.payouts.insert(payout.id().clone(), payout.clone());
            Ok::<_, SettlementError>(payout)
        })?;

        info!(
            merchant = %merchant_id,
            payout = %payout.id(),
            amount = %payout.amount(),
            "payout requested"
        );
        Ok(payout)
    }

    /// Execute a pending payout, recording the outcome.
    ///
    /// A failed execution releases the amount back into the merchant's
    /// available earnings.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::InvalidTransition`] unless the payout is
    /// pending.
    pub async fn process_payout(
        &self,
        payout_id: &PayoutId,
        succeeded: bool,
        failure_reason: Option<String>,
    ) -> Result<Payout, SettlementError> {
        let now = Timestamp::now();
        let payout = self.store.commit(|state| {
            let payout = state
                .payouts
                .get_mut(payout_id)
                .ok_or_else(|| SettlementError::not_found("Payout", payout_id))?;
            payout.begin_processing()?;
            if succeeded {
                payout.complete(now)?;
            } else {
                payout.fail(failure_reason.clone(), now)?;
            }
            Ok::<_, SettlementError>(payout.clone())
        })?;

        info!(payout = %payout_id, status = %payout.status(), "payout processed");
        Ok(payout)
    }
}

/// Earnings not yet claimed by a completed or in-flight payout.
fn available_earnings(state: &StoreState, merchant_id: &MerchantId) -> Money {
    let Some(merchant) = state.merchants.get(merchant_id) else {
        return Money::ZERO;
    };
    let in_flight: Money = state
        .payouts
        .values()
        .filter(|p| {
            p.merchant_id() == merchant_id
                && matches!(p.status(), PayoutStatus::Pending | PayoutStatus::Processing)
        })
        .map(Payout::amount)
        .sum();
    (merchant.pending_earnings(state.completed_payouts_for(merchant_id)) - in_flight)
        .clamp_non_negative()
}
