//! Pricing policy: the configurable knobs of the calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::shipping::ShippingRateTable;

/// Configurable pricing parameters.
///
/// Tax is a flat stub rate; a real tax engine is an external concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Flat tax rate applied to the subtotal.
    pub tax_rate: Decimal,
    /// Currency value of a single loyalty point.
    pub points_unit_value: Decimal,
    /// Shipping rate table.
    pub shipping: ShippingRateTable,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            points_unit_value: dec!(0.01),
            shipping: ShippingRateTable::default(),
        }
    }
}
