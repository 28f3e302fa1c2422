//! Merchant Bounded Context
//!
//! Merchant accounts, the referral attribution funnel, and the payout
//! ledger. Earnings counters are monotonic; pending earnings are always
//! derived from completed payouts, never stored.

mod errors;
mod merchant;
mod payout;
mod policy;
mod referral;

pub use errors::{PayoutError, ReferralError};
pub use merchant::{Merchant, MerchantStatus, NewMerchantParams};
pub use payout::{Payout, PayoutStatus};
pub use policy::{PayoutPolicy, ReferralPolicy};
pub use referral::{MerchantReferral, ReferralStatus};
