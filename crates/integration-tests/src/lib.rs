//! Integration tests for QuickShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickshop-integration-tests
//! ```
//!
//! Every test runs against a local mock catalog and a throwaway snapshot
//! directory; nothing touches the network or the real order file.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to confirmation, end to end
//! - `catalog_pages` - Listing, filtering, and abandoned fetches
//! - `notification` - Order emails through the submission flow

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::time::Duration;

use quickshop_storefront::catalog::CatalogClient;
use quickshop_storefront::config::{CatalogConfig, NotifyConfig, TotalsPolicy};
use quickshop_storefront::order::FileOrderStore;
use quickshop_storefront::services::EmailNotifier;
use quickshop_storefront::state::{Session, StorefrontSession};
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock catalog plus a scratch directory for order snapshots.
pub struct TestContext {
    pub catalog: MockServer,
    pub dir: TempDir,
}

impl TestContext {
    /// Start a mock catalog serving `products` at `/products` and each one
    /// at `/products/{id}`.
    pub async fn new(products: &[Value]) -> Self {
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(&catalog)
            .await;

        for product in products {
            let id = product["id"].to_string();
            Mock::given(method("GET"))
                .and(path(format!("/products/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(product))
                .mount(&catalog)
                .await;
        }

        Self {
            catalog,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Serve the first three products for `?limit=3`.
    pub async fn with_featured(self, featured: &[Value]) -> Self {
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(featured))
            .with_priority(1)
            .mount(&self.catalog)
            .await;
        self
    }

    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("state/orderSummary.json")
    }

    #[must_use]
    pub fn catalog_client(&self) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(&self.catalog.uri()).unwrap(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(60),
        })
        .unwrap()
    }

    /// A fresh session (empty cart) sharing this context's snapshot file.
    #[must_use]
    pub fn session(&self) -> StorefrontSession {
        Session::new(
            self.catalog_client(),
            FileOrderStore::new(self.snapshot_path()),
            None,
            TotalsPolicy::default(),
        )
    }

    /// A session that emails order confirmations to `endpoint`.
    #[must_use]
    pub fn session_with_notifier(&self, endpoint: &str) -> StorefrontSession {
        let notifier = EmailNotifier::new(&NotifyConfig {
            endpoint: Url::parse(endpoint).unwrap(),
            api_key: SecretString::from("qs_live_8fK2pZ7rVx"),
            from: "orders@quickshop.local".to_string(),
        })
        .unwrap();

        Session::new(
            self.catalog_client(),
            FileOrderStore::new(self.snapshot_path()),
            Some(notifier),
            TotalsPolicy::default(),
        )
    }
}

/// A catalog record in the provider's wire shape.
#[must_use]
pub fn product_json(id: u64, title: &str, price: f64, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("https://img.test/{id}.jpg"),
        "rating": { "rate": 3.9, "count": 120 }
    })
}

/// A small catalog with prices that add up cleanly.
#[must_use]
pub fn sample_catalog() -> Vec<Value> {
    vec![
        product_json(1, "Fjallraven Foldsack No. 1 Backpack", 109.95, "men's clothing"),
        product_json(3, "Mens Cotton Jacket", 55.99, "men's clothing"),
        product_json(5, "John Hardy Women's Chain Bracelet", 695.0, "jewelery"),
        product_json(7, "White Gold Plated Princess", 10.0, "jewelery"),
        product_json(9, "WD 2TB Elements Portable", 5.0, "electronics"),
        product_json(14, "Samsung 49-Inch Curved Monitor", 999.99, "electronics"),
    ]
}
