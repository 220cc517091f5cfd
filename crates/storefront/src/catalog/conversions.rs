//! Raw catalog record conversion.
//!
//! The provider sends loosely-typed JSON (`price` as a float, extra fields such
//! as `rating`). Records are deserialized into [`RawProduct`] and converted
//! once into [`Product`].

use quickshop_core::{Price, Product, ProductId};
use serde::Deserialize;

use super::CatalogError;

/// Product record exactly as the catalog sends it.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    id: ProductId,
    title: String,
    price: serde_json::Number,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
}

impl TryFrom<RawProduct> for Product {
    type Error = CatalogError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let price = Price::parse(&raw.price.to_string()).map_err(|e| {
            CatalogError::InvalidProduct {
                id: raw.id.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            id: raw.id,
            title: raw.title,
            price,
            image: raw.image,
            description: raw.description,
            category: raw.category,
        })
    }
}

/// Convert a listing, failing on the first invalid record.
pub fn convert_products(raw: Vec<RawProduct>) -> Result<Vec<Product>, CatalogError> {
    raw.into_iter().map(Product::try_from).collect()
}
