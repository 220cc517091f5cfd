//! Home, product listing, and product details pages.

use quickshop_core::{Price, PriceError, Product, ProductId};
use quickshop_storefront::catalog::{ProductFilter, categories};
use quickshop_storefront::order::OrderStore;
use quickshop_storefront::page::{LoadState, PageScope};
use quickshop_storefront::services::Notifier;
use quickshop_storefront::state::Session;

use super::until_interrupted;
use crate::output;

/// Build a listing filter from command-line values.
///
/// Missing price bounds fall back to the default range.
pub fn build_filter(
    search: String,
    category: Option<String>,
    min_price: Option<&str>,
    max_price: Option<&str>,
) -> Result<ProductFilter, PriceError> {
    let default = ProductFilter::default();
    let min = min_price
        .map(Price::parse)
        .transpose()?
        .unwrap_or(*default.price_range.start());
    let max = max_price
        .map(Price::parse)
        .transpose()?
        .unwrap_or(*default.price_range.end());

    Ok(ProductFilter {
        search,
        category,
        price_range: min..=max,
    })
}

pub async fn home<S: OrderStore, N: Notifier>(session: &Session<S, N>) -> bool {
    let scope = PageScope::new();
    let mut state = LoadState::Loading;

    let Some(notice) = until_interrupted(&scope, session.load_featured(&scope, &mut state)).await
    else {
        return false;
    };
    if let Some(notice) = notice {
        output::notice(&notice);
    }
    let LoadState::Loaded(products) = state else {
        return false;
    };

    output::line("Best sellers");
    output::line("");
    for product in &products {
        output::product_row(product);
    }
    true
}

pub async fn products<S: OrderStore, N: Notifier>(
    session: &Session<S, N>,
    limit: Option<u32>,
    filter: &ProductFilter,
) -> bool {
    let Some(products) = load_listing(session, limit).await else {
        return false;
    };

    output::line(&format!("Categories: {}", categories(&products).join(", ")));
    output::line("");

    let matched = filter.apply(&products);
    if matched.is_empty() {
        output::line("No products match your filters.");
    }
    for product in matched {
        output::product_row(product);
    }
    true
}

pub async fn product<S: OrderStore, N: Notifier>(session: &Session<S, N>, id: &ProductId) -> bool {
    let scope = PageScope::new();
    let mut state = LoadState::Loading;

    let Some(notice) =
        until_interrupted(&scope, session.load_product(&scope, &mut state, id)).await
    else {
        return false;
    };
    if let Some(notice) = notice {
        output::notice(&notice);
    }

    match state {
        LoadState::Loaded(product) => {
            output::product_details(&product);
            true
        }
        LoadState::Loading | LoadState::Failed(_) => false,
    }
}

async fn load_listing<S: OrderStore, N: Notifier>(
    session: &Session<S, N>,
    limit: Option<u32>,
) -> Option<Vec<Product>> {
    let scope = PageScope::new();
    let mut state = LoadState::Loading;

    let notice = until_interrupted(&scope, session.load_products(&scope, &mut state, limit)).await?;
    if let Some(notice) = notice {
        output::notice(&notice);
    }

    match state {
        LoadState::Loaded(products) => Some(products),
        LoadState::Loading | LoadState::Failed(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_defaults() {
        let filter = build_filter(String::new(), None, None, None).unwrap();
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_build_filter_price_bounds() {
        let filter = build_filter(
            "jacket".to_string(),
            Some("men's clothing".to_string()),
            Some("20"),
            Some("60.50"),
        )
        .unwrap();
        assert_eq!(filter.search, "jacket");
        assert_eq!(*filter.price_range.start(), Price::from_cents(2000));
        assert_eq!(*filter.price_range.end(), Price::from_cents(6050));
    }

    #[test]
    fn test_build_filter_rejects_bad_price() {
        assert!(build_filter(String::new(), None, Some("cheap"), None).is_err());
        assert!(build_filter(String::new(), None, None, Some("-5")).is_err());
    }
}
