//! Persistence adapters.

mod store;

pub use store::{SettlementStore, StoreState};
