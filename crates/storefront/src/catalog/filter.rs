//! Local filtering of a fetched product listing.
//!
//! The catalog API has no search endpoint, so the products page fetches the
//! full listing once and narrows it in memory as the shopper types.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use quickshop_core::{Price, Product};

/// Filters applied to the products page listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the title. Empty matches everything.
    pub search: String,
    /// Exact category. `None` matches every category.
    pub category: Option<String>,
    /// Inclusive price bounds.
    pub price_range: RangeInclusive<Price>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            price_range: Price::ZERO..=Price::from_cents(100_000),
        }
    }
}

impl ProductFilter {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.to_lowercase();
        self.matches_with_needle(product, &search)
    }

    /// Products passing the filter, in listing order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let search = self.search.to_lowercase();
        products
            .iter()
            .filter(|p| self.matches_with_needle(p, &search))
            .collect()
    }

    fn matches_with_needle(&self, product: &Product, needle: &str) -> bool {
        product.title.to_lowercase().contains(needle)
            && self
                .category
                .as_ref()
                .is_none_or(|category| &product.category == category)
            && self.price_range.contains(&product.price)
    }
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen = HashSet::new();
    products
        .iter()
        .map(|p| p.category.as_str())
        .filter(|category| seen.insert(*category))
        .collect()
}
