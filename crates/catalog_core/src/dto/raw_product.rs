use crate::dto::variety::VarietyDto;
use crate::model::raw_product::RawProductId;
use serde::{Deserialize, Serialize};

/// Request to create a raw product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRawProductDto {
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
}

/// Request to overwrite the fields of an existing raw product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRawProductDto {
    pub id: RawProductId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
}

/// Raw product read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductDto {
    pub id: RawProductId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
}

/// Raw product aggregate read model with its varieties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductWithVarietiesDto {
    pub id: RawProductId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    /// Empty when the raw product has no varieties.
    pub varieties: Vec<VarietyDto>,
}
