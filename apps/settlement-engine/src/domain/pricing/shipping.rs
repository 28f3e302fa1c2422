//! Shipping methods and the rate table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Money;

/// How an order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Standard ground shipping.
    Standard,
    /// Express shipping.
    Express,
    /// Overnight shipping.
    Overnight,
    /// Digital delivery, never shipped.
    Digital,
    /// Customer pickup, never shipped.
    Pickup,
}

impl ShippingMethod {
    /// Whether this method involves a physical shipment.
    #[must_use]
    pub const fn requires_shipment(&self) -> bool {
        matches!(self, Self::Standard | Self::Express | Self::Overnight)
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
            Self::Digital => "digital",
            Self::Pickup => "pickup",
        };
        write!(f, "{s}")
    }
}

/// Domestic and international rates for one shipping method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Rate when the destination is the domestic country.
    pub domestic: Money,
    /// Rate for all other destinations.
    pub international: Money,
}

impl ShippingRate {
    const fn new(domestic: Money, international: Money) -> Self {
        Self {
            domestic,
            international,
        }
    }
}

/// Rate table keyed by (method, destination zone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingRateTable {
    /// ISO country code treated as domestic.
    pub domestic_country: String,
    /// Standard shipping rates.
    pub standard: ShippingRate,
    /// Express shipping rates.
    pub express: ShippingRate,
    /// Overnight shipping rates.
    pub overnight: ShippingRate,
}

impl Default for ShippingRateTable {
    fn default() -> Self {
        Self {
            domestic_country: "KE".to_string(),
            standard: ShippingRate::new(Money::from_major(10), Money::from_major(25)),
            express: ShippingRate::new(Money::from_major(25), Money::from_major(50)),
            overnight: ShippingRate::new(Money::from_major(50), Money::from_major(100)),
        }
    }
}

impl ShippingRateTable {
    /// Cost of shipping via the given method to the given country.
    ///
    /// Digital delivery and pickup are always free.
    #[must_use]
    pub fn cost(&self, method: ShippingMethod, destination_country: &str) -> Money {
        let rate = match method {
            ShippingMethod::Digital | ShippingMethod::Pickup => return Money::ZERO,
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
            ShippingMethod::Overnight => self.overnight,
        };
        if destination_country.eq_ignore_ascii_case(&self.domestic_country) {
            rate.domestic
        } else {
            rate.international
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ShippingMethod::Standard, "KE", 10; "standard domestic")]
    #[test_case(ShippingMethod::Standard, "US", 25; "standard international")]
    #[test_case(ShippingMethod::Express, "KE", 25; "express domestic")]
    #[test_case(ShippingMethod::Express, "DE", 50; "express international")]
    #[test_case(ShippingMethod::Overnight, "ke", 50; "overnight domestic case insensitive")]
    #[test_case(ShippingMethod::Overnight, "UG", 100; "overnight international")]
    #[test_case(ShippingMethod::Digital, "US", 0; "digital free")]
    #[test_case(ShippingMethod::Pickup, "KE", 0; "pickup free")]
    fn rate_table(method: ShippingMethod, country: &str, expected: i64) {
        let table = ShippingRateTable::default();
        assert_eq!(table.cost(method, country), Money::from_major(expected));
    }

    #[test]
    fn requires_shipment() {
        assert!(ShippingMethod::Standard.requires_shipment());
        assert!(ShippingMethod::Overnight.requires_shipment());
        assert!(!ShippingMethod::Digital.requires_shipment());
        assert!(!ShippingMethod::Pickup.requires_shipment());
    }

    #[test]
    fn method_serde_uses_snake_case() {
        let json = serde_json::to_string(&ShippingMethod::Overnight).unwrap();
        assert_eq!(json, "\"overnight\"");
        let parsed: ShippingMethod = serde_json::from_str("\"pickup\"").unwrap();
        assert_eq!(parsed, ShippingMethod::Pickup);
    }
}
