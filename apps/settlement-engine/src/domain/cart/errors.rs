//! Cart mutation errors.

use thiserror::Error;

use crate::domain::catalog::ItemKey;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be at least one when adding.
    #[error("quantity must be at least 1, got {quantity}")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: u32,
    },

    /// The item is not in the cart.
    #[error("item {key} is not in the cart")]
    ItemNotFound {
        /// The missing item.
        key: ItemKey,
    },
}
