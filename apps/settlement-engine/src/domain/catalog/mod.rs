//! Catalog Bounded Context
//!
//! Read-only snapshots of the external product catalog. The engine never
//! writes catalog data; it re-reads current prices at checkout and freezes
//! them onto order lines.

mod snapshots;

pub use snapshots::{ItemKey, Priceable, ProductSnapshot, VariantSnapshot};
