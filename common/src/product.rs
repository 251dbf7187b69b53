use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique product identifier within the catalog. Built-in products use
/// slug ids, admin-added ones a stringified timestamp.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.to_owned())
    }
}

/// A purchasable catalog entry. Built-in products and admin-added records
/// both normalize into this shape before reaching shopper-facing code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in naira. No decimal subunits in this domain.
    pub price: u64,
    /// Pre-discount price. Only meaningful as a discount baseline when
    /// strictly above `price`; equal or lower means "no discount".
    #[serde(default)]
    pub original_price: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Product {
    /// Percentage off, rounded to the nearest whole percent, when the
    /// original price is strictly above the current price.
    pub fn discount_percent(&self) -> Option<u8> {
        match self.original_price {
            Some(original) if original > self.price => {
                let off = (original - self.price) * 100;
                Some(((off + original / 2) / original) as u8)
            }
            _ => None,
        }
    }

    /// True when this product belongs on a deals rail.
    pub fn is_deal(&self) -> bool {
        self.discount_percent().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(price: u64, original_price: Option<u64>) -> Product {
        Product {
            id: ProductId::from("p-1"),
            name: "Test".into(),
            price,
            original_price,
            image_url: None,
            images: Vec::new(),
            category: "Phones".into(),
            brand: None,
            description: String::new(),
            specifications: None,
            features: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            is_featured: false,
        }
    }

    #[test]
    fn discount_percent_rounds_to_nearest() {
        // 1,450,000 -> 1,200,000 is a 17.24% cut
        assert_eq!(product(1_200_000, Some(1_450_000)).discount_percent(), Some(17));
        // 320,000 -> 250,000 is 21.875%
        assert_eq!(product(250_000, Some(320_000)).discount_percent(), Some(22));
    }

    #[test]
    fn equal_or_lower_original_price_is_not_a_discount() {
        assert_eq!(product(1000, Some(1000)).discount_percent(), None);
        assert_eq!(product(1000, Some(900)).discount_percent(), None);
        assert_eq!(product(1000, None).discount_percent(), None);
    }

    #[test]
    fn optional_fields_deserialize_when_absent() {
        let json = r#"{
            "id": "x",
            "name": "Bare",
            "price": 5000,
            "category": "Audio",
            "created_at": "2025-01-10T00:00:00Z"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.original_price, None);
        assert_eq!(p.brand, None);
        assert_eq!(p.description, "");
        assert!(p.images.is_empty());
        assert!(!p.is_featured);
    }
}
