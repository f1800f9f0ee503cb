//! Catalog item entity.
//!
//! # Invariants
//! - `short_code` is unique across all catalog items.
//! - `total_weight` is strictly positive.

use crate::model::raw_product::RawProductId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a catalog item.
pub type CatalogItemId = Uuid;

/// Sellable article made from one raw product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    /// European article number, when the item carries a barcode.
    pub ean: Option<String>,
    pub total_weight: f64,
    pub raw_product_id: RawProductId,
}

impl CatalogItem {
    /// Creates a catalog item under `raw_product_id` with a fresh identity.
    pub fn new(
        name: impl Into<String>,
        short_code: impl Into<String>,
        description: Option<String>,
        ean: Option<String>,
        total_weight: f64,
        raw_product_id: RawProductId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            short_code: short_code.into(),
            description,
            ean,
            total_weight,
            raw_product_id,
        }
    }
}
