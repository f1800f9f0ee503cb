//! Raw product entity.
//!
//! # Invariants
//! - `short_code` is unique across all raw products.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a raw product.
pub type RawProductId = Uuid;

/// Base agricultural product that varieties and catalog items hang off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: RawProductId,
    pub name: String,
    /// Exact, case-sensitive business key.
    pub short_code: String,
    pub description: Option<String>,
}

impl RawProduct {
    /// Creates a raw product with a freshly generated identity.
    pub fn new(
        name: impl Into<String>,
        short_code: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            short_code: short_code.into(),
            description,
        }
    }
}
