//! Variety entity.
//!
//! # Invariants
//! - `(short_code, raw_product_id)` is unique; the same short code may be
//!   reused under a different raw product.

use crate::model::raw_product::RawProductId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a variety.
pub type VarietyId = Uuid;

/// Cultivar of one raw product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variety {
    pub id: VarietyId,
    pub name: String,
    pub short_code: String,
    pub description: Option<String>,
    pub raw_product_id: RawProductId,
}

impl Variety {
    /// Creates a variety under `raw_product_id` with a fresh identity.
    pub fn new(
        name: impl Into<String>,
        short_code: impl Into<String>,
        description: Option<String>,
        raw_product_id: RawProductId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            short_code: short_code.into(),
            description,
            raw_product_id,
        }
    }
}
