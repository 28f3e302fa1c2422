//! The cart aggregate.

use serde::{Deserialize, Serialize};

use super::errors::CartError;
use crate::domain::catalog::ItemKey;
use crate::domain::shared::{CartId, Money, Timestamp, UserId};

/// One line in a cart.
///
/// `unit_price` is a convenience snapshot from add time; checkout always
/// re-reads the current catalog price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product, optionally narrowed to a variant.
    pub key: ItemKey,
    /// Display name at add time.
    pub name: String,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Price snapshot from add time.
    pub unit_price: Money,
    /// Digital goods never incur shipping.
    pub is_digital: bool,
    /// Cleared when the item went out of stock or was deactivated.
    pub is_available: bool,
    /// When the item was first added.
    pub added_at: Timestamp,
}

impl CartItem {
    /// Line total at the snapshot price.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Read-only view of a cart, as returned to the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Cart identifier.
    pub cart_id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// All items, including unavailable ones.
    pub items: Vec<CartItem>,
    /// Subtotal over available items only.
    pub subtotal: Money,
    /// Unit count over available items only.
    pub item_count: u32,
    /// Last mutation time.
    pub updated_at: Timestamp,
}

/// The mutable draft cart, one per user.
///
/// Subtotal and item count are maintained eagerly; every mutation
/// recomputes them before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    user_id: UserId,
    items: Vec<CartItem>,
    subtotal: Money,
    item_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Cart {
    /// Create an empty cart for a user.
    #[must_use]
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            subtotal: Money::ZERO,
            item_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cart identifier.
    #[must_use]
    pub const fn id(&self) -> &CartId {
        &self.id
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// All items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Items that are still purchasable.
    pub fn available_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|i| i.is_available)
    }

    /// Subtotal over available items.
    #[must_use]
    pub const fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Unit count over available items.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Last mutation time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// True when no available item remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available_items().next().is_none()
    }

    /// True when every available item is a digital good.
    #[must_use]
    pub fn all_digital(&self) -> bool {
        !self.is_empty() && self.available_items().all(|i| i.is_digital)
    }

    /// True when the cart has been idle longer than the expiry window.
    #[must_use]
    pub fn is_stale(&self, now: Timestamp, expiry_days: i64) -> bool {
        self.updated_at.plus_days(expiry_days).is_before(now)
    }

    /// Add an item, merging quantities when the key is already present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when `quantity` is zero.
    pub fn add_item(
        &mut self,
        key: ItemKey,
        name: String,
        unit_price: Money,
        quantity: u32,
        is_digital: bool,
        now: Timestamp,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        match self.items.iter_mut().find(|i| i.key == key) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
                existing.unit_price = unit_price;
                existing.is_available = true;
            }
            None => self.items.push(CartItem {
                key,
                name,
                quantity,
                unit_price,
                is_digital,
                is_available: true,
                added_at: now,
            }),
        }
        self.recompute(now);
        Ok(())
    }

    /// Set an item's quantity; zero removes the item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] when the key is not in the cart.
    pub fn update_quantity(
        &mut self,
        key: &ItemKey,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), CartError> {
        let position = self
            .items
            .iter()
            .position(|i| &i.key == key)
            .ok_or_else(|| CartError::ItemNotFound { key: key.clone() })?;
        if quantity == 0 {
            self.items.remove(position);
        } else {
            self.items[position].quantity = quantity;
        }
        self.recompute(now);
        Ok(())
    }

    /// Flag an item's availability without removing it.
    ///
    /// Unknown keys are ignored; availability is advisory.
    pub fn set_availability(&mut self, key: &ItemKey, is_available: bool, now: Timestamp) {
        if let Some(item) = self.items.iter_mut().find(|i| &i.key == key) {
            item.is_available = is_available;
            self.recompute(now);
        }
    }

    /// Remove every item.
    pub fn clear(&mut self, now: Timestamp) {
        self.items.clear();
        self.recompute(now);
    }

    /// Build the read-only summary view.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            cart_id: self.id.clone(),
            user_id: self.user_id.clone(),
            items: self.items.clone(),
            subtotal: self.subtotal,
            item_count: self.item_count,
            updated_at: self.updated_at,
        }
    }

    fn recompute(&mut self, now: Timestamp) {
        self.subtotal = self.available_items().map(CartItem::line_total).sum();
        self.item_count = self
            .items
            .iter()
            .filter(|i| i.is_available)
            .map(|i| i.quantity)
            .sum();
        self.updated_at = now;
    }
}
