//! Product listing sort orders.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Product;

/// Sort order for product listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Best rating first.
    #[default]
    Rating,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Parse from URL parameter value. Unknown values fall back to rating.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" | "price_asc" => Self::PriceAsc,
            "price-desc" | "price_desc" => Self::PriceDesc,
            _ => Self::Rating,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rating => "Best Rating",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
        }
    }

    /// Compare two products under this order.
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Rating => b.rating.rate.total_cmp(&a.rating.rate),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
        }
    }

    /// Stable sort in place; ties keep their incoming order.
    pub fn sort(self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

impl<'de> Deserialize<'de> for ProductSort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
