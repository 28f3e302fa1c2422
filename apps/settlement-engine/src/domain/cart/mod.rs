//! Cart Bounded Context
//!
//! One mutable draft cart per user. Totals are recomputed synchronously
//! on every mutation; items that went unavailable stay in the cart but
//! are flagged and excluded from totals.

mod aggregate;
mod errors;

pub use aggregate::{Cart, CartItem, CartSummary};
pub use errors::CartError;
