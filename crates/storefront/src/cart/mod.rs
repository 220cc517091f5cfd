//! Shopping cart store.
//!
//! The [`CartStore`] is the single source of truth for what the shopper
//! intends to buy. It is owned by the session and handed to pages by
//! reference; every mutation is visible to the very next read.

mod merge;

pub use merge::merge_line_items;

use quickshop_core::{Price, Product};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::add_breadcrumb;

/// A product plus the quantity of it in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    /// A line holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Ordered line items for the current browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<CartLineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// If a line for the same product identifier exists its quantity is
    /// incremented in place; otherwise a new line is appended.
    pub fn add(&mut self, product: Product) {
        let id = product.id.to_string();

        if let Some(line) = self.items.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(product_id = %id, quantity = line.quantity, "Incremented cart line");
        } else {
            self.items.push(CartLineItem::new(product));
            debug!(product_id = %id, "Appended cart line");
        }

        add_breadcrumb("cart", "Added product to cart", Some(&[("product_id", id.as_str())]));
    }

    /// Remove the line at `index`, returning it.
    ///
    /// An out-of-range index leaves the cart untouched and returns `None`.
    pub fn remove(&mut self, index: usize) -> Option<CartLineItem> {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "Ignoring removal of missing cart line");
            return None;
        }

        let removed = self.items.remove(index);
        let id = removed.product.id.to_string();
        add_breadcrumb(
            "cart",
            "Removed product from cart",
            Some(&[("product_id", id.as_str())]),
        );
        Some(removed)
    }

    /// Set the quantity of the line at `index`. A quantity of zero removes
    /// the line.
    ///
    /// Returns `false` if there is no line at `index`.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(index).is_some();
        }

        match self.items.get_mut(index) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Atomically swap the entire sequence. Lines with a zero quantity are
    /// dropped.
    pub fn replace_all(&mut self, items: Vec<CartLineItem>) {
        self.items = items.into_iter().filter(|l| l.quantity > 0).collect();
    }

    /// Collapse duplicate product lines (see [`merge_line_items`]).
    pub fn merge(&mut self) {
        let items = std::mem::take(&mut self.items);
        self.replace_all(merge_line_items(items));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (the navigation badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}
