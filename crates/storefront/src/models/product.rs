//! Product listings and marketplace filtering.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bakehouse_core::{Price, ProductId, UserId};

/// A seller's product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub image_url: Option<String>,
    pub seller_id: UserId,
    pub seller_name: String,
    pub created_at: DateTime<Utc>,
}

/// A listing about to be stored.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub description: String,
    pub image_url: Option<String>,
    pub seller_id: UserId,
    pub seller_name: String,
}

/// Marketplace search and price bounds.
///
/// Every bound is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl ProductFilter {
    /// Whether `product` passes the search term and both price bounds.
    ///
    /// The search term matches title or description, ignoring case. Bounds
    /// are inclusive.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let term = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        if let Some(term) = term
            && !product.title.to_lowercase().contains(&term)
            && !product.description.to_lowercase().contains(&term)
        {
            return false;
        }

        let amount = product.price.amount();
        self.min.is_none_or(|min| amount >= min) && self.max.is_none_or(|max| amount <= max)
    }

    /// Keep only the products that match, preserving order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}
