//! Inventory Bounded Context
//!
//! Per-item stock ledger with all-or-nothing reservation for an order's
//! lines. Stock for tracked items can never go negative.

mod ledger;

pub use ledger::{InventoryError, InventoryLedger, StockLevel};
