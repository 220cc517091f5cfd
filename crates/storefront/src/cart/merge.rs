//! Collapsing duplicate cart entries into quantity-bearing line items.

use std::collections::HashMap;

use quickshop_core::ProductId;

use super::CartLineItem;

/// Merge line items that share a product identifier.
///
/// The output holds each identifier once, at the position of its first
/// occurrence, with the quantities of every occurrence summed. The product
/// data of the first occurrence wins. Merging a merged cart returns it
/// unchanged.
#[must_use]
pub fn merge_line_items(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut positions: HashMap<ProductId, usize> = HashMap::with_capacity(items.len());
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());

    for item in items {
        if let Some(&pos) = positions.get(&item.product.id) {
            if let Some(existing) = merged.get_mut(pos) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
        } else {
            positions.insert(item.product.id.clone(), merged.len());
            merged.push(item);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use quickshop_core::{Price, Product};

    use super::*;

    fn line(id: u64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product: Product {
                id: ProductId::Numeric(id),
                title: format!("Product {id}"),
                price: Price::from_cents(100),
                image: String::new(),
                description: String::new(),
                category: String::new(),
            },
            quantity,
        }
    }

    fn summary(items: &[CartLineItem]) -> Vec<(ProductId, u32)> {
        items
            .iter()
            .map(|i| (i.product.id.clone(), i.quantity))
            .collect()
    }

    #[test]
    fn test_merge_counts_occurrences_in_first_seen_order() {
        // A, A, B, A
        let merged = merge_line_items(vec![line(1, 1), line(1, 1), line(2, 1), line(1, 1)]);
        assert_eq!(
            summary(&merged),
            vec![(ProductId::Numeric(1), 3), (ProductId::Numeric(2), 1)]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_line_items(vec![line(3, 1), line(1, 2), line(3, 1), line(2, 1)]);
        let twice = merge_line_items(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_sums_existing_quantities() {
        let merged = merge_line_items(vec![line(5, 2), line(5, 3)]);
        assert_eq!(summary(&merged), vec![(ProductId::Numeric(5), 5)]);
    }

    #[test]
    fn test_numeric_and_text_ids_stay_separate() {
        let mut text = line(7, 1);
        text.product.id = ProductId::Text("7".to_string());
        let merged = merge_line_items(vec![line(7, 1), text, line(7, 1)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].quantity, 2);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_line_items(Vec::new()).is_empty());
    }
}
