//! The merchant aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{MerchantId, Money, Points, Timestamp, UserId};

/// Approval status of a merchant account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantStatus {
    /// Awaiting review.
    Pending,
    /// Approved to sell and refer.
    Approved,
    /// Suspended by the platform.
    Suspended,
}

impl fmt::Display for MerchantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Suspended => "suspended",
        };
        write!(f, "{s}")
    }
}

/// Everything needed to open a merchant account.
#[derive(Debug, Clone)]
pub struct NewMerchantParams {
    /// The merchant's platform user (receives referral points).
    pub user_id: UserId,
    /// Trading name.
    pub business_name: String,
    /// Unique human-readable referral code.
    pub referral_code: String,
    /// Commission rate for new referrals.
    pub commission_rate: Decimal,
    /// Points per conversion for new referrals.
    pub points_per_referral: Points,
    /// Minimum payout threshold.
    pub minimum_payout: Money,
    /// Creation time.
    pub now: Timestamp,
}

/// A merchant account with its earnings counters.
///
/// `total_earnings`, `total_points_earned`, and `successful_referrals`
/// only ever grow, and only through referral conversions. Pending
/// earnings are derived against completed payouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    id: MerchantId,
    user_id: UserId,
    business_name: String,
    referral_code: String,
    commission_rate: Decimal,
    points_per_referral: Points,
    minimum_payout: Money,
    status: MerchantStatus,
    is_active: bool,
    total_earnings: Money,
    total_points_earned: Points,
    total_referrals: u32,
    successful_referrals: u32,
    created_at: Timestamp,
}

impl Merchant {
    /// Open a merchant account, pending approval.
    #[must_use]
    pub fn new(params: NewMerchantParams) -> Self {
        Self {
            id: MerchantId::generate(),
            user_id: params.user_id,
            business_name: params.business_name,
            referral_code: params.referral_code,
            commission_rate: params.commission_rate,
            points_per_referral: params.points_per_referral,
            minimum_payout: params.minimum_payout,
            status: MerchantStatus::Pending,
            is_active: true,
            total_earnings: Money::ZERO,
            total_points_earned: Points::ZERO,
            total_referrals: 0,
            successful_referrals: 0,
            created_at: params.now,
        }
    }

    /// Merchant identifier.
    #[must_use]
    pub const fn id(&self) -> &MerchantId {
        &self.id
    }

    /// The merchant's platform user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Trading name.
    #[must_use]
    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    /// The code embedded in the merchant's referral links.
    #[must_use]
    pub fn referral_code(&self) -> &str {
        &self.referral_code
    }

    /// Current commission rate; frozen onto referrals at click time.
    #[must_use]
    pub const fn commission_rate(&self) -> Decimal {
        self.commission_rate
    }

    /// Points per conversion; frozen onto referrals at click time.
    #[must_use]
    pub const fn points_per_referral(&self) -> Points {
        self.points_per_referral
    }

    /// Minimum payout threshold.
    #[must_use]
    pub const fn minimum_payout(&self) -> Money {
        self.minimum_payout
    }

    /// Approval status.
    #[must_use]
    pub const fn status(&self) -> MerchantStatus {
        self.status
    }

    /// Lifetime commission earned.
    #[must_use]
    pub const fn total_earnings(&self) -> Money {
        self.total_earnings
    }

    /// Lifetime points earned from referrals.
    #[must_use]
    pub const fn total_points_earned(&self) -> Points {
        self.total_points_earned
    }

    /// Referral link clicks, regardless of outcome.
    #[must_use]
    pub const fn total_referrals(&self) -> u32 {
        self.total_referrals
    }

    /// Referrals that converted.
    #[must_use]
    pub const fn successful_referrals(&self) -> u32 {
        self.successful_referrals
    }

    /// Fraction of clicks that converted.
    #[must_use]
    pub fn conversion_rate(&self) -> Decimal {
        if self.total_referrals == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(self.successful_referrals) / Decimal::from(self.total_referrals)
        }
    }

    /// Whether new referrals may be tracked for this merchant.
    #[must_use]
    pub fn can_refer(&self) -> bool {
        self.status == MerchantStatus::Approved && self.is_active
    }

    /// Approve the merchant.
    pub fn approve(&mut self) {
        self.status = MerchantStatus::Approved;
    }

    /// Suspend the merchant; existing referrals still convert.
    pub fn suspend(&mut self) {
        self.status = MerchantStatus::Suspended;
    }

    /// Change the commission rate for future referrals.
    pub fn set_commission_rate(&mut self, rate: Decimal) {
        self.commission_rate = rate;
    }

    /// Count a referral click.
    pub fn record_click(&mut self) {
        self.total_referrals = self.total_referrals.saturating_add(1);
    }

    /// Credit a conversion: commission, points, and the success counter.
    pub fn record_conversion(&mut self, commission: Money, points: Points) {
        self.total_earnings += commission;
        self.total_points_earned += points;
        self.successful_referrals = self.successful_referrals.saturating_add(1);
    }

    /// Earnings not yet paid out, given the sum of completed payouts.
    #[must_use]
    pub fn pending_earnings(&self, completed_payouts: Money) -> Money {
        (self.total_earnings - completed_payouts).clamp_non_negative()
    }
}
