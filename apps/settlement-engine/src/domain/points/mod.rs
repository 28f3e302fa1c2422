//! Points Bounded Context
//!
//! Per-user loyalty points ledger. The balance can never go negative;
//! spends are rejected up front rather than clamped.

mod account;
mod policy;

pub use account::{PointsAccount, PointsEntry, PointsEntryKind, PointsError};
pub use policy::PointsPolicy;
