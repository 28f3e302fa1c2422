//! The stock ledger.

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::catalog::ItemKey;

/// Stock state for one sellable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    /// Units on hand.
    pub available: u32,
    /// Whether the item's inventory is tracked at all.
    pub tracked: bool,
    /// Whether orders may exceed available stock.
    pub allow_backorder: bool,
}

impl StockLevel {
    /// Tracked stock with the given quantity and no backorders.
    #[must_use]
    pub const fn tracked(available: u32) -> Self {
        Self {
            available,
            tracked: true,
            allow_backorder: false,
        }
    }

    /// Untracked stock, always available.
    #[must_use]
    pub const fn untracked() -> Self {
        Self {
            available: 0,
            tracked: false,
            allow_backorder: false,
        }
    }
}

/// Reservation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Not enough stock for a tracked item without backorders.
    #[error("insufficient stock for {key}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The item that failed.
        key: ItemKey,
        /// Quantity requested.
        requested: u32,
        /// Quantity actually available.
        available: u32,
    },
}

/// Tracks available quantity per item.
///
/// Reservation of an order's lines is all or nothing: every line is
/// verified before any decrement is applied, so a failing line leaves
/// the ledger untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    levels: HashMap<ItemKey, StockLevel>,
}

impl InventoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace the stock level for an item.
    pub fn set_stock(&mut self, key: ItemKey, level: StockLevel) {
        self.levels.insert(key, level);
    }

    /// Current available quantity, if the item is tracked.
    #[must_use]
    pub fn available(&self, key: &ItemKey) -> Option<u32> {
        self.levels
            .get(key)
            .filter(|l| l.tracked)
            .map(|l| l.available)
    }

    /// Soft availability check, used by the cart.
    ///
    /// Unknown and untracked items are always available; hard
    /// enforcement happens at reservation time.
    #[must_use]
    pub fn check_available(&self, key: &ItemKey, quantity: u32) -> bool {
        match self.levels.get(key) {
            Some(level) if level.tracked => {
                level.allow_backorder || level.available >= quantity
            }
            _ => true,
        }
    }

    /// Reserve stock for every line, or none at all.
    ///
    /// Lines sharing a key are aggregated before verification, so their
    /// combined demand is checked against the level.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientStock`] for a line that
    /// cannot be satisfied; no decrement is applied in that case.
    pub fn reserve_all(&mut self, lines: &[(ItemKey, u32)]) -> Result<(), InventoryError> {
        let mut demand: HashMap<&ItemKey, u32> = HashMap::new();
        for (key, quantity) in lines {
            let total = demand.entry(key).or_insert(0);
            *total = total.saturating_add(*quantity);
        }
        // Verify every key before touching anything.
        for (&key, &quantity) in &demand {
            if let Some(level) = self.levels.get(key) {
                if level.tracked && !level.allow_backorder && level.available < quantity {
                    return Err(InventoryError::InsufficientStock {
                        key: key.clone(),
                        requested: quantity,
                        available: level.available,
                    });
                }
            }
        }
        for (key, quantity) in demand {
            if let Some(level) = self.levels.get_mut(key) {
                if level.tracked {
                    // Backordered lines clamp at zero.
                    level.available = level.available.saturating_sub(quantity);
                }
            }
        }
        Ok(())
    }

    /// Restock every line, on cancellation or refund.
    pub fn release_all(&mut self, lines: &[(ItemKey, u32)]) {
        for (key, quantity) in lines {
            if let Some(level) = self.levels.get_mut(key) {
                if level.tracked {
                    level.available = level.available.saturating_add(*quantity);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::ProductId;

    fn key(id: &str) -> ItemKey {
        ItemKey::product(ProductId::new(id))
    }

    fn ledger() -> InventoryLedger {
        let mut l = InventoryLedger::new();
        l.set_stock(key("prod-1"), StockLevel::tracked(5));
        l.set_stock(key("prod-2"), StockLevel::tracked(2));
        l.set_stock(key("prod-3"), StockLevel::untracked());
        l
    }

    #[test]
    fn check_available_tracked() {
        let l = ledger();
        assert!(l.check_available(&key("prod-1"), 5));
        assert!(!l.check_available(&key("prod-1"), 6));
    }

    #[test]
    fn check_available_untracked_and_unknown() {
        let l = ledger();
        assert!(l.check_available(&key("prod-3"), 1_000));
        assert!(l.check_available(&key("prod-x"), 1_000));
    }

    #[test]
    fn reserve_decrements_exactly() {
        let mut l = ledger();
        l.reserve_all(&[(key("prod-1"), 2)]).unwrap();
        assert_eq!(l.available(&key("prod-1")), Some(3));
    }

    #[test]
    fn reserve_is_all_or_nothing() {
        let mut l = ledger();
        let result = l.reserve_all(&[(key("prod-1"), 2), (key("prod-2"), 3)]);

        assert_eq!(
            result,
            Err(InventoryError::InsufficientStock {
                key: key("prod-2"),
                requested: 3,
                available: 2,
            })
        );
        // The first line was not applied either.
        assert_eq!(l.available(&key("prod-1")), Some(5));
        assert_eq!(l.available(&key("prod-2")), Some(2));
    }

    #[test]
    fn duplicate_lines_are_checked_against_combined_demand() {
        let mut l = ledger();
        let result = l.reserve_all(&[(key("prod-1"), 3), (key("prod-1"), 3)]);

        assert_eq!(
            result,
            Err(InventoryError::InsufficientStock {
                key: key("prod-1"),
                requested: 6,
                available: 5,
            })
        );
        assert_eq!(l.available(&key("prod-1")), Some(5));

        // Duplicates that fit in aggregate still reserve normally.
        l.reserve_all(&[(key("prod-1"), 2), (key("prod-1"), 3)])
            .unwrap();
        assert_eq!(l.available(&key("prod-1")), Some(0));
    }

    #[test]
    fn release_restores_pre_reservation_levels() {
        let mut l = ledger();
        let lines = [(key("prod-1"), 2), (key("prod-2"), 1)];
        l.reserve_all(&lines).unwrap();
        l.release_all(&lines);

        assert_eq!(l.available(&key("prod-1")), Some(5));
        assert_eq!(l.available(&key("prod-2")), Some(2));
    }

    #[test]
    fn backorder_allows_oversell_and_clamps_at_zero() {
        let mut l = InventoryLedger::new();
        l.set_stock(
            key("prod-b"),
            StockLevel {
                available: 1,
                tracked: true,
                allow_backorder: true,
            },
        );

        l.reserve_all(&[(key("prod-b"), 3)]).unwrap();
        assert_eq!(l.available(&key("prod-b")), Some(0));
    }

    #[test]
    fn untracked_reservation_is_noop() {
        let mut l = ledger();
        l.reserve_all(&[(key("prod-3"), 50)]).unwrap();
        assert_eq!(l.available(&key("prod-3")), None);
    }
}
