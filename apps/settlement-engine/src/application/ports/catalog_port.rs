//! Catalog Port (Driven Port)
//!
//! Read-only access to the external product catalog. The engine re-reads
//! current prices through this port at checkout; cart snapshots are never
//! trusted for pricing.

use async_trait::async_trait;

use crate::domain::catalog::{ItemKey, Priceable, ProductSnapshot, VariantSnapshot};
use crate::domain::shared::{Money, ProductId, VariantId};

/// Catalog lookup error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// The catalog service could not be reached.
    #[error("catalog unavailable: {message}")]
    Unavailable {
        /// What went wrong.
        message: String,
    },
}

/// A fully resolved order line candidate.
///
/// Price resolution has already applied the variant-over-product rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    /// The key that was resolved.
    pub key: ItemKey,
    /// Display name, including the variant when present.
    pub name: String,
    /// Current unit price.
    pub unit_price: Money,
    /// Digital goods never incur shipping.
    pub is_digital: bool,
    /// Whether the item can be sold right now.
    pub is_sellable: bool,
}

/// Port for catalog lookups.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Look up a product by id.
    async fn product(&self, id: &ProductId) -> Result<Option<ProductSnapshot>, CatalogError>;

    /// Look up a variant by id.
    async fn variant(&self, id: &VariantId) -> Result<Option<VariantSnapshot>, CatalogError>;

    /// Resolve an item key to a priced line candidate.
    ///
    /// Returns `None` when the product (or requested variant) does not
    /// exist.
    async fn resolve(&self, key: &ItemKey) -> Result<Option<ResolvedItem>, CatalogError> {
        let Some(product) = self.product(&key.product).await? else {
            return Ok(None);
        };
        match &key.variant {
            None => Ok(Some(ResolvedItem {
                key: key.clone(),
                name: product.name.clone(),
                unit_price: product.current_price(),
                is_digital: product.is_digital,
                is_sellable: product.is_sellable(),
            })),
            Some(variant_id) => {
                let Some(variant) = self.variant(variant_id).await? else {
                    return Ok(None);
                };
                Ok(Some(ResolvedItem {
                    key: key.clone(),
                    name: format!("{} ({})", product.name, variant.name),
                    unit_price: variant.current_price(),
                    is_digital: product.is_digital,
                    is_sellable: product.is_sellable() && variant.is_sellable(),
                }))
            }
        }
    }
}
