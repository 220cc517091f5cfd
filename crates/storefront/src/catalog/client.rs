//! HTTP client for the product catalog.

use std::sync::Arc;

use moka::future::Cache;
use quickshop_core::{Product, ProductId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::conversions::{RawProduct, convert_products};
use crate::config::CatalogConfig;

/// Number of products shown in the home page best-sellers strip.
const FEATURED_LIMIT: u32 = 3;

/// Client for the product catalog API.
///
/// Cheap to clone; clones share one connection pool and one response cache.
/// Failed requests are never cached.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products, optionally capped at `limit` records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the catalog answers with a
    /// non-success status, or a record cannot be mapped into a [`Product`].
    #[instrument(skip(self))]
    pub async fn list_products(&self, limit: Option<u32>) -> Result<Vec<Product>, CatalogError> {
        let cache_key = CacheKey::Products { limit };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.products_url(None)?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }

        let raw: Vec<RawProduct> = self.get_json(url).await?;
        let products = convert_products(raw)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// The home page best sellers.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::list_products`].
    pub async fn featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_products(Some(FEATURED_LIMIT)).await
    }

    /// Get a single product by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog has no such product,
    /// or another error if the request or mapping fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.products_url(Some(&id.to_string()))?;
        let raw: RawProduct = self
            .get_json(url)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(_) => CatalogError::NotFound(format!("product {id}")),
                other => other,
            })?;
        let product = Product::try_from(raw)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// `{base}/products` or `{base}/products/{id}`.
    fn products_url(&self, id: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?;
            segments.pop_if_empty().push("products");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Execute a GET and decode the JSON body.
    ///
    /// A 404, or a 2xx with an empty body (how the catalog answers unknown
    /// identifiers), is reported as [`CatalogError::NotFound`].
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Catalog returned non-success status");
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}
