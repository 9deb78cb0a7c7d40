//! Catalog product types.
//!
//! These mirror the product records served by the catalog API and are the
//! same shape the cart and wishlist persist, so the field names follow the
//! wire format (`image` holds the image URL).

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Aggregate customer rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    /// Average rating on a 0 to 5 scale.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

/// A product as returned by the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    /// Image URL.
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Whether the product mentions `needle` in its title, description or
    /// category. `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FJALLRAVEN: &str = r#"{
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    }"#;

    #[test]
    fn test_deserialize_catalog_product() {
        let product: Product = serde_json::from_str(FJALLRAVEN).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.category, "men's clothing");
        assert!(product.image_url.ends_with(".jpg"));
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_serialize_uses_image_key() {
        let product: Product = serde_json::from_str(FJALLRAVEN).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("image").is_some());
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn test_missing_rating_defaults() {
        let product: Product = serde_json::from_str(
            r#"{"id":2,"title":"t","price":1,"description":"d","category":"c","image":"i"}"#,
        )
        .unwrap();
        assert_eq!(product.rating, Rating::default());
    }

    #[test]
    fn test_matches_lowercase() {
        let product: Product = serde_json::from_str(FJALLRAVEN).unwrap();
        assert!(product.matches_lowercase("backpack"));
        assert!(product.matches_lowercase("forest"));
        assert!(product.matches_lowercase("men's"));
        assert!(!product.matches_lowercase("jewel"));
    }
}
