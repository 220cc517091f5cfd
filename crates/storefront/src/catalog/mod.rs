//! Product catalog API client.
//!
//! # Architecture
//!
//! - Plain HTTP+JSON `GET` against a fixed base endpoint via `reqwest`
//! - Read-only: the catalog is the source of truth for product records
//! - Raw JSON records are mapped into strict [`Product`] values at the
//!   boundary; nothing past this module sees the provider's shape
//! - In-memory caching via `moka` for successful responses
//!
//! # Example
//!
//! ```rust,ignore
//! use quickshop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let featured = client.featured_products().await?;
//! let product = client.get_product(&ProductId::Numeric(7)).await?;
//! ```
//!
//! [`Product`]: quickshop_core::Product

mod cache;
mod client;
mod conversions;
pub mod filter;

pub use client::CatalogClient;
pub use filter::{ProductFilter, categories};

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog returned a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but violates the product invariants.
    #[error("invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },

    /// The configured base URL cannot have path segments appended.
    #[error("invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),
}
