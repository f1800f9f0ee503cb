use crate::model::raw_product::RawProductId;
use crate::model::variety::VarietyId;
use serde::{Deserialize, Serialize};

/// Request to create a variety under a raw product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVarietyDto {
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub raw_product_id: RawProductId,
}

/// Request to overwrite a variety; may move it to another raw product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVarietyDto {
    pub id: VarietyId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub raw_product_id: RawProductId,
}

/// Variety read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarietyDto {
    pub id: VarietyId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub raw_product_id: RawProductId,
    /// Denormalized display name of the parent raw product.
    pub raw_product_name: String,
}
