//! Storefront product catalog and checkout data.

use serde::{Deserialize, Serialize};

/// A product offered on the inventory screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Price in cents
    pub price_cents: u32,
}

impl Product {
    /// `data-test` slug for this product
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// Sauce Labs Backpack
pub const BACKPACK: &str = "Sauce Labs Backpack";
/// Sauce Labs Bike Light
pub const BIKE_LIGHT: &str = "Sauce Labs Bike Light";
/// Sauce Labs Bolt T-Shirt
pub const BOLT_TSHIRT: &str = "Sauce Labs Bolt T-Shirt";
/// Sauce Labs Fleece Jacket
pub const FLEECE_JACKET: &str = "Sauce Labs Fleece Jacket";
/// Sauce Labs Onesie
pub const ONESIE: &str = "Sauce Labs Onesie";
/// Test.allTheThings() T-Shirt (Red)
pub const RED_TSHIRT: &str = "Test.allTheThings() T-Shirt (Red)";

/// Every product in inventory order
pub static PRODUCTS: [Product; 6] = [
    Product { name: BACKPACK, price_cents: 2999 },
    Product { name: BIKE_LIGHT, price_cents: 999 },
    Product { name: BOLT_TSHIRT, price_cents: 1599 },
    Product { name: FLEECE_JACKET, price_cents: 4999 },
    Product { name: ONESIE, price_cents: 799 },
    Product { name: RED_TSHIRT, price_cents: 1599 },
];

/// Look a product up by its slug
#[must_use]
pub fn product_by_slug(slug: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.slug() == slug)
}

/// `"Sauce Labs Backpack"` -> `"sauce-labs-backpack"`
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Format cents as `$12.34`
#[must_use]
pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Shopper details entered on the first checkout step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Postal code
    pub postal_code: String,
}

impl CheckoutInfo {
    /// Create checkout details
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }
}

impl Default for CheckoutInfo {
    fn default() -> Self {
        Self::new("John", "Doe", "12345")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify(BACKPACK), "sauce-labs-backpack");
        assert_eq!(slugify(RED_TSHIRT), "test.allthethings()-t-shirt-(red)");
    }

    #[test]
    fn test_lookup_by_slug() {
        assert_eq!(
            product_by_slug(&slugify(BIKE_LIGHT)).map(|p| p.price_cents),
            Some(999)
        );
        assert_eq!(
            product_by_slug("sauce-labs-onesie").map(|p| p.name),
            Some(ONESIE)
        );
        assert!(product_by_slug("sauce-labs-umbrella").is_none());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(2999), "$29.99");
        assert_eq!(format_price(240), "$2.40");
        assert_eq!(format_price(5), "$0.05");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_slug_has_no_spaces_or_capitals(name in "[A-Za-z0-9 ().]{1,40}") {
                let slug = slugify(&name);
                prop_assert!(!slug.contains(' '));
                prop_assert_eq!(slug.to_lowercase(), slug.clone());
                prop_assert_eq!(slug.len(), name.len());
            }

            #[test]
            fn prop_price_round_trips_cents(cents in 0u32..10_000_000) {
                let text = format_price(cents);
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                prop_assert_eq!(digits.parse::<u32>().unwrap(), cents);
                prop_assert_eq!(text.rsplit('.').next().map(str::len), Some(2));
            }
        }
    }
}
