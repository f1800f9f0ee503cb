//! Catalog management core: raw products, their varieties and catalog items.
//! This crate owns the validation and short-code uniqueness rules.

pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{CatalogConfig, ConfigError, DatabaseConfig, LoggingConfig};
pub use dto::catalog_item::{AddCatalogItemDto, CatalogItemDto, UpdateCatalogItemDto};
pub use dto::raw_product::{
    AddRawProductDto, RawProductDto, RawProductWithVarietiesDto, UpdateRawProductDto,
};
pub use dto::variety::{AddVarietyDto, UpdateVarietyDto, VarietyDto};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::catalog_item::{CatalogItem, CatalogItemId};
pub use model::raw_product::{RawProduct, RawProductId};
pub use model::variety::{Variety, VarietyId};
pub use repo::catalog_item_repo::{
    CatalogItemKey, CatalogItemRecord, CatalogItemRepository, SqliteCatalogItemRepository,
};
pub use repo::raw_product_repo::{
    RawProductAggregate, RawProductDeletion, RawProductDependents, RawProductKey,
    RawProductRepository, SqliteRawProductRepository,
};
pub use repo::variety_repo::{SqliteVarietyRepository, VarietyRecord, VarietyRepository};
pub use repo::{RepoError, RepoResult};
pub use service::cancel::CancellationToken;
pub use service::catalog_item_service::CatalogItemService;
pub use service::error::{EntityKind, ServiceError, ServiceErrorKind, ServiceResult};
pub use service::raw_product_service::RawProductService;
pub use service::variety_service::VarietyService;
pub use validation::ValidationError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
