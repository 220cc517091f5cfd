//! Identifier types for products and orders.
//!
//! Product identifiers come from the external catalog and may be either
//! numeric or textual. Order identifiers are generated locally.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a catalog product.
///
/// The catalog provider decides the shape: most records carry an integer,
/// some carry an opaque string. Equality is exact, so `7` and `"7"` are
/// different products.
///
/// ```
/// use quickshop_core::ProductId;
///
/// let id: ProductId = "7".parse().unwrap();
/// assert_eq!(id, ProductId::Numeric(7));
///
/// let id: ProductId = "sku-abc".parse().unwrap();
/// assert_eq!(id, ProductId::Text("sku-abc".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer identifier (the common case).
    Numeric(u64),
    /// Opaque string identifier.
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for ProductId {
    /// Same rules as [`FromStr`]: all-digit input is numeric.
    fn from(id: &str) -> Self {
        id.parse::<u64>()
            .map_or_else(|_| Self::Text(id.to_owned()), Self::Numeric)
    }
}

/// Identifier of a submitted order snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random order ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
