//! Unified error handling with Sentry integration.
//!
//! Every failure the storefront can hit is an [`AppError`]. Nothing here is
//! fatal: each error degrades to a user-visible [`Notice`] while the caller
//! keeps its prior state. Server-side failures (catalog, notification,
//! storage) are captured to Sentry before the notice is produced.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::FieldErrors;
use crate::config::ConfigError;
use crate::order::StorageError;
use crate::services::NotifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product listing could not be loaded.
    #[error("Failed to fetch products: {0}")]
    Products(#[source] CatalogError),

    /// A single product could not be loaded.
    #[error("Failed to fetch product details: {0}")]
    ProductDetails(#[source] CatalogError),

    /// Order notification could not be delivered.
    #[error("Notification error: {0}")]
    Notification(#[from] NotifyError),

    /// Order snapshot could not be persisted or read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout form has failing fields.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A submission is already in flight or has completed.
    #[error("Order already submitted")]
    AlreadySubmitted,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl AppError {
    /// Whether this error is captured to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Products(_) | Self::ProductDetails(_) | Self::Notification(_) | Self::Storage(_)
        )
    }

    /// The message shown to the shopper.
    ///
    /// Internal details never leak into the notice.
    #[must_use]
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Products(_) => "Failed to fetch products.",
            Self::ProductDetails(_) => "Failed to fetch product details.",
            Self::Notification(_) => {
                "We couldn't send your order confirmation. Your cart has been kept, please try again."
            }
            Self::Storage(_) => "We couldn't save your order. Please try again.",
            Self::Validation(_) => "Please fix the highlighted fields.",
            Self::EmptyCart => "Your cart is empty.",
            Self::AlreadySubmitted => "This order has already been placed.",
            Self::Config(_) => "The store is misconfigured.",
        };
        Notice::error(message)
    }

    /// Log the error, capture it to Sentry if reportable, and return the
    /// notice to show.
    #[must_use]
    pub fn report(&self) -> Notice {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Storefront error");
        }

        self.notice()
    }
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product to cart", Some(&[("product_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
