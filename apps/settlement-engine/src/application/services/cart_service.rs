//! Cart service: the draft-cart operations.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::application::ports::CatalogPort;
use crate::domain::cart::{Cart, CartSummary};
use crate::domain::catalog::ItemKey;
use crate::domain::inventory::InventoryError;
use crate::domain::shared::{Timestamp, UserId};
use crate::error::SettlementError;
use crate::infrastructure::persistence::SettlementStore;

/// Manages the one mutable draft cart per user.
///
/// Stock checks here are soft; hard enforcement happens at order
/// creation.
pub struct CartService {
    store: Arc<SettlementStore>,
    catalog: Arc<dyn CatalogPort>,
    expiry_days: i64,
}

impl CartService {
    /// Create the service.
    #[must_use]
    pub fn new(store: Arc<SettlementStore>, catalog: Arc<dyn CatalogPort>, expiry_days: i64) -> Self {
        Self {
            store,
            catalog,
            expiry_days,
        }
    }

    /// Add an item to the user's cart, creating the cart lazily.
    ///
    /// # Errors
    ///
    /// Fails when the item is unknown, not sellable, the quantity is
    /// zero, or available stock cannot cover the cart's new quantity.
    pub async fn add_item(
        &self,
        user_id: &UserId,
        key: &ItemKey,
        quantity: u32,
    ) -> Result<CartSummary, SettlementError> {
        let resolved = self
            .catalog
            .resolve(key)
            .await?
            .ok_or_else(|| SettlementError::not_found("Item", key))?;
        if !resolved.is_sellable {
            return Err(SettlementError::validation(format!(
                "item {key} is not available"
            )));
        }

        // Soft check against the quantity the cart would end up holding.
        let wanted = self.store.read(|s| {
            s.carts
                .get(user_id)
                .and_then(|c| c.items().iter().find(|i| &i.key == key))
                .map_or(quantity, |i| i.quantity.saturating_add(quantity))
        });
        self.check_stock(key, wanted)?;

        let now = Timestamp::now();
        let user = user_id.clone();
        let summary = self.store.commit(move |state| {
            let cart = state
                .carts
                .entry(user.clone())
                .or_insert_with(|| Cart::new(user, now));
            cart.add_item(
                key.clone(),
                resolved.name,
                resolved.unit_price,
                quantity,
                resolved.is_digital,
                now,
            )?;
            Ok::<_, SettlementError>(cart.summary())
        })?;

        info!(user = %user_id, item = %key, quantity, "cart item added");
        Ok(summary)
    }

    /// Set an item's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Fails when the user has no cart, the item is not in it, or stock
    /// cannot cover the new quantity.
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        key: &ItemKey,
        quantity: u32,
    ) -> Result<CartSummary, SettlementError> {
        if quantity > 0 {
            self.check_stock(key, quantity)?;
        }
        let now = Timestamp::now();
        let summary = self.store.commit(|state| {
            let cart = state
                .carts
                .get_mut(user_id)
                .ok_or_else(|| SettlementError::not_found("Cart", user_id))?;
            cart.update_quantity(key, quantity, now)?;
            Ok::<_, SettlementError>(cart.summary())
        })?;

        info!(user = %user_id, item = %key, quantity, "cart quantity updated");
        Ok(summary)
    }

    /// Drop the user's cart entirely.
    pub async fn clear(&self, user_id: &UserId) -> Result<(), SettlementError> {
        self.store.commit(|state| {
            state.carts.remove(user_id);
            Ok::<_, SettlementError>(())
        })
    }

    /// Current cart summary, with availability flags refreshed against
    /// the catalog and the stock ledger.
    pub async fn summary(&self, user_id: &UserId) -> Result<CartSummary, SettlementError> {
        let Some(items) = self
            .store
            .read(|s| s.carts.get(user_id).map(|c| c.items().to_vec()))
        else {
            return Ok(Cart::new(user_id.clone(), Timestamp::now()).summary());
        };

        // Catalog lookups happen outside the lock.
        let mut availability: HashMap<ItemKey, bool> = HashMap::new();
        for item in &items {
            let sellable = self
                .catalog
                .resolve(&item.key)
                .await?
                .is_some_and(|r| r.is_sellable);
            availability.insert(item.key.clone(), sellable);
        }

        let now = Timestamp::now();
        self.store.commit(|state| {
            let in_stock: HashMap<ItemKey, bool> = items
                .iter()
                .map(|i| {
                    (
                        i.key.clone(),
                        state.inventory.check_available(&i.key, i.quantity),
                    )
                })
                .collect();
            let cart = state
                .carts
                .get_mut(user_id)
                .ok_or_else(|| SettlementError::not_found("Cart", user_id))?;
            for item in &items {
                let available = availability.get(&item.key).copied().unwrap_or(false)
                    && in_stock.get(&item.key).copied().unwrap_or(true);
                cart.set_availability(&item.key, available, now);
            }
            Ok::<_, SettlementError>(cart.summary())
        })
    }

    /// Remove carts idle longer than the expiry window. Returns how many
    /// were dropped.
    pub async fn sweep_expired(&self) -> Result<usize, SettlementError> {
        let now = Timestamp::now();
        let expiry_days = self.expiry_days;
        let removed = self.store.commit(move |state| {
            let stale: Vec<UserId> = state
                .carts
                .iter()
                .filter(|(_, cart)| cart.is_stale(now, expiry_days))
                .map(|(user, _)| user.clone())
                .collect();
            for user in &stale {
                state.carts.remove(user);
            }
            Ok::<_, SettlementError>(stale.len())
        })?;

        if removed > 0 {
            info!(removed, "expired carts swept");
        }
        Ok(removed)
    }

    fn check_stock(&self, key: &ItemKey, quantity: u32) -> Result<(), SettlementError> {
        let (ok, available) = self.store.read(|s| {
            (
                s.inventory.check_available(key, quantity),
                s.inventory.available(key).unwrap_or(0),
            )
        });
        if ok {
            Ok(())
        } else {
            Err(InventoryError::InsufficientStock {
                key: key.clone(),
                requested: quantity,
                available,
            }
            .into())
        }
    }
}
