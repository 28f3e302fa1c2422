//! In-memory catalog adapter.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{CatalogError, CatalogPort};
use crate::domain::catalog::{ProductSnapshot, VariantSnapshot};
use crate::domain::shared::{Money, ProductId, VariantId};

/// In-memory implementation of `CatalogPort`.
///
/// Suitable for testing and development; prices are mutable so tests can
/// exercise price drift between cart add and checkout.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductSnapshot>>,
    variants: RwLock<HashMap<VariantId, VariantSnapshot>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    pub fn upsert_product(&self, product: ProductSnapshot) {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        products.insert(product.id.clone(), product);
    }

    /// Add or replace a variant, syncing the parent's base price.
    pub fn upsert_variant(&self, mut variant: VariantSnapshot) {
        {
            let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(parent) = products.get(&variant.product_id) {
                variant.base_price = parent.price;
            }
        }
        let mut variants = self
            .variants
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        variants.insert(variant.id.clone(), variant);
    }

    /// Change a product's price, for drift scenarios.
    pub fn set_product_price(&self, id: &ProductId, price: Money) {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(product) = products.get_mut(id) {
            product.price = price;
        }
    }

    /// Deactivate a product.
    pub fn deactivate_product(&self, id: &ProductId) {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(product) = products.get_mut(id) {
            product.is_active = false;
        }
    }
}

#[async_trait]
impl CatalogPort for InMemoryCatalog {
    async fn product(&self, id: &ProductId) -> Result<Option<ProductSnapshot>, CatalogError> {
        let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
        Ok(products.get(id).cloned())
    }

    async fn variant(&self, id: &VariantId) -> Result<Option<VariantSnapshot>, CatalogError> {
        let variants = self.variants.read().unwrap_or_else(PoisonError::into_inner);
        Ok(variants.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ItemKey;

    fn product(id: &str, price: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: "Ceramic Mug".to_string(),
            price: Money::from_major(price),
            is_active: true,
            is_digital: false,
        }
    }

    #[tokio::test]
    async fn lookup_round_trip() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_product(product("prod-1", 100));

        let found = catalog.product(&ProductId::new("prod-1")).await.unwrap();
        assert_eq!(found.unwrap().price, Money::from_major(100));

        let missing = catalog.product(&ProductId::new("prod-x")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn resolve_product_key() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_product(product("prod-1", 100));

        let resolved = catalog
            .resolve(&ItemKey::product(ProductId::new("prod-1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.unit_price, Money::from_major(100));
        assert!(resolved.is_sellable);
    }

    #[tokio::test]
    async fn resolve_variant_applies_override() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_product(product("prod-1", 100));
        catalog.upsert_variant(VariantSnapshot {
            id: VariantId::new("var-1"),
            product_id: ProductId::new("prod-1"),
            name: "Large".to_string(),
            price_override: Some(Money::from_major(120)),
            base_price: Money::ZERO,
            is_active: true,
        });

        let resolved = catalog
            .resolve(&ItemKey::variant(
                ProductId::new("prod-1"),
                VariantId::new("var-1"),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.unit_price, Money::from_major(120));
        assert_eq!(resolved.name, "Ceramic Mug (Large)");
    }

    #[tokio::test]
    async fn price_drift_visible_on_next_resolve() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_product(product("prod-1", 100));
        catalog.set_product_price(&ProductId::new("prod-1"), Money::from_major(110));

        let resolved = catalog
            .resolve(&ItemKey::product(ProductId::new("prod-1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.unit_price, Money::from_major(110));
    }

    #[tokio::test]
    async fn deactivated_product_not_sellable() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_product(product("prod-1", 100));
        catalog.deactivate_product(&ProductId::new("prod-1"));

        let resolved = catalog
            .resolve(&ItemKey::product(ProductId::new("prod-1")))
            .await
            .unwrap()
            .unwrap();
        assert!(!resolved.is_sellable);
    }
}
