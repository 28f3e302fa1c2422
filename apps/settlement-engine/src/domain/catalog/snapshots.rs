//! Product and variant snapshots from the external catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Money, ProductId, VariantId};

/// Capability for anything that can be priced on an order line.
///
/// Both products and variants resolve a current price; variants fall back
/// to the base product price when they carry no override.
pub trait Priceable {
    /// The current unit price, as of the moment the snapshot was taken.
    fn current_price(&self) -> Money;

    /// Whether the item can currently be sold.
    fn is_sellable(&self) -> bool;
}

/// Identity of a sellable item: a product, optionally narrowed to a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// The base product.
    pub product: ProductId,
    /// The chosen variant, if the product has variants.
    pub variant: Option<VariantId>,
}

impl ItemKey {
    /// Key for a product without a variant.
    #[must_use]
    pub const fn product(product: ProductId) -> Self {
        Self {
            product,
            variant: None,
        }
    }

    /// Key for a specific variant of a product.
    #[must_use]
    pub const fn variant(product: ProductId, variant: VariantId) -> Self {
        Self {
            product,
            variant: Some(variant),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(v) => write!(f, "{}/{}", self.product, v),
            None => write!(f, "{}", self.product),
        }
    }
}

/// Frozen view of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog product identifier.
    pub id: ProductId,
    /// Display name at snapshot time.
    pub name: String,
    /// Current base price.
    pub price: Money,
    /// Whether the product is active in the catalog.
    pub is_active: bool,
    /// Digital goods never incur shipping.
    pub is_digital: bool,
}

impl Priceable for ProductSnapshot {
    fn current_price(&self) -> Money {
        self.price
    }

    fn is_sellable(&self) -> bool {
        self.is_active
    }
}

/// Frozen view of a product variant.
///
/// Carries the parent's base price so price resolution needs no second
/// catalog round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    /// Catalog variant identifier.
    pub id: VariantId,
    /// Parent product.
    pub product_id: ProductId,
    /// Variant display name (e.g. size or color).
    pub name: String,
    /// Variant-specific price, when it differs from the base product.
    pub price_override: Option<Money>,
    /// Parent product base price.
    pub base_price: Money,
    /// Whether both the variant and its parent are active.
    pub is_active: bool,
}

impl Priceable for VariantSnapshot {
    fn current_price(&self) -> Money {
        self.price_override.unwrap_or(self.base_price)
    }

    fn is_sellable(&self) -> bool {
        self.is_active
    }
}
