//! Points service: the loyalty account operations.

use std::sync::Arc;

use tracing::info;

use crate::domain::points::{PointsAccount, PointsPolicy};
use crate::domain::shared::{Points, Timestamp, UserId};
use crate::error::SettlementError;
use crate::infrastructure::persistence::SettlementStore;

/// Manages per-user loyalty point accounts.
///
/// Order-driven movements (earn on delivery, spend at checkout, refund
/// on cancellation) happen inside the order service's units of work;
/// this service covers the standalone operations.
pub struct PointsService {
    store: Arc<SettlementStore>,
    policy: PointsPolicy,
}

impl PointsService {
    /// Create the service.
    #[must_use]
    pub fn new(store: Arc<SettlementStore>, policy: PointsPolicy) -> Self {
        Self { store, policy }
    }

    /// The user's account, zeroed when none exists yet.
    pub async fn account(&self, user_id: &UserId) -> Result<PointsAccount, SettlementError> {
        Ok(self
            .store
            .read(|s| s.points.get(user_id).cloned())
            .unwrap_or_else(|| PointsAccount::new(user_id.clone())))
    }

    /// Current spendable balance.
    pub async fn balance(&self, user_id: &UserId) -> Result<Points, SettlementError> {
        Ok(self
            .store
            .read(|s| s.points.get(user_id).map(PointsAccount::balance))
            .unwrap_or(Points::ZERO))
    }

    /// Credit points with a reason, e.g. a manual promotion.
    pub async fn credit(
        &self,
        user_id: &UserId,
        points: Points,
        reason: &str,
    ) -> Result<Points, SettlementError> {
        let now = Timestamp::now();
        let balance = self.store.commit(|state| {
            let account = state.points_account_mut(user_id);
            account.earn(points, reason, now);
            Ok::<_, SettlementError>(account.balance())
        })?;

        info!(user = %user_id, %points, reason, "points credited");
        Ok(balance)
    }

    /// Credit the signup bonus for a newly referred user.
    pub async fn grant_signup_bonus(&self, user_id: &UserId) -> Result<Points, SettlementError> {
        let bonus = Points::new(self.policy.signup_bonus);
        self.credit(user_id, bonus, "signup bonus").await
    }
}
