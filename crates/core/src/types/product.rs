//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as offered by the catalog.
///
/// Built once at the catalog boundary and never mutated afterwards; cart lines
/// and order snapshots hold their own copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub description: String,
    pub category: String,
}

impl Product {
    /// Default title length on listing cards.
    pub const SHORT_TITLE_CHARS: usize = 18;

    /// Title truncated to `max_chars` characters, with `...` appended when
    /// anything was cut.
    #[must_use]
    pub fn short_title(&self, max_chars: usize) -> String {
        if self.title.chars().count() <= max_chars {
            return self.title.clone();
        }
        let mut short: String = self.title.chars().take(max_chars).collect();
        short.push_str("...");
        short
    }
}
