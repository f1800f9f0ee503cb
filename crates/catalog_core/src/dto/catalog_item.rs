use crate::model::catalog_item::CatalogItemId;
use crate::model::raw_product::RawProductId;
use serde::{Deserialize, Serialize};

/// Request to create a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCatalogItemDto {
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub total_weight: f64,
    pub raw_product_id: RawProductId,
}

/// Request to overwrite a catalog item; may move it to another raw product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCatalogItemDto {
    pub id: CatalogItemId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub total_weight: f64,
    pub raw_product_id: RawProductId,
}

/// Catalog item read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemDto {
    pub id: CatalogItemId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub total_weight: f64,
    pub raw_product_id: RawProductId,
    /// Denormalized display name of the parent raw product.
    pub raw_product_name: String,
}
