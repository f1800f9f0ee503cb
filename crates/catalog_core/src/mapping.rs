//! Field-by-field projections between DTOs and entities.
//!
//! # Responsibility
//! - Build new entities from add requests (identity generated here).
//! - Copy update requests onto fetched entities.
//! - Project entities into read models, attaching denormalized names.
//!
//! # Invariants
//! - Update projections never touch the entity `id`.
//! - Projections are pure field copies; no storage access.

use crate::dto::catalog_item::{AddCatalogItemDto, CatalogItemDto, UpdateCatalogItemDto};
use crate::dto::raw_product::{
    AddRawProductDto, RawProductDto, RawProductWithVarietiesDto, UpdateRawProductDto,
};
use crate::dto::variety::{AddVarietyDto, UpdateVarietyDto, VarietyDto};
use crate::model::catalog_item::CatalogItem;
use crate::model::raw_product::RawProduct;
use crate::model::variety::Variety;

pub fn raw_product_from_add(dto: &AddRawProductDto) -> RawProduct {
    RawProduct::new(
        dto.name.as_str(),
        dto.short_code.as_str(),
        dto.description.clone(),
    )
}

pub fn apply_raw_product_update(entity: &mut RawProduct, dto: &UpdateRawProductDto) {
    entity.name.clone_from(&dto.name);
    entity.short_code.clone_from(&dto.short_code);
    entity.description.clone_from(&dto.description);
}

pub fn raw_product_to_dto(entity: &RawProduct) -> RawProductDto {
    RawProductDto {
        id: entity.id,
        name: entity.name.clone(),
        short_code: entity.short_code.clone(),
        description: entity.description.clone(),
    }
}

/// Builds the aggregate read model; each variety gets the parent's name.
pub fn raw_product_with_varieties(
    entity: &RawProduct,
    varieties: &[Variety],
) -> RawProductWithVarietiesDto {
    RawProductWithVarietiesDto {
        id: entity.id,
        name: entity.name.clone(),
        short_code: entity.short_code.clone(),
        description: entity.description.clone(),
        varieties: varieties
            .iter()
            .map(|variety| variety_to_dto(variety, &entity.name))
            .collect(),
    }
}

pub fn variety_from_add(dto: &AddVarietyDto) -> Variety {
    Variety::new(
        dto.name.as_str(),
        dto.short_code.as_str(),
        dto.description.clone(),
        dto.raw_product_id,
    )
}

pub fn apply_variety_update(entity: &mut Variety, dto: &UpdateVarietyDto) {
    entity.name.clone_from(&dto.name);
    entity.short_code.clone_from(&dto.short_code);
    entity.description.clone_from(&dto.description);
    entity.raw_product_id = dto.raw_product_id;
}

pub fn variety_to_dto(entity: &Variety, raw_product_name: &str) -> VarietyDto {
    VarietyDto {
        id: entity.id,
        name: entity.name.clone(),
        short_code: entity.short_code.clone(),
        description: entity.description.clone(),
        raw_product_id: entity.raw_product_id,
        raw_product_name: raw_product_name.to_string(),
    }
}

pub fn catalog_item_from_add(dto: &AddCatalogItemDto) -> CatalogItem {
    CatalogItem::new(
        dto.name.as_str(),
        dto.short_code.as_str(),
        dto.description.clone(),
        dto.ean.clone(),
        dto.total_weight,
        dto.raw_product_id,
    )
}

pub fn apply_catalog_item_update(entity: &mut CatalogItem, dto: &UpdateCatalogItemDto) {
    entity.name.clone_from(&dto.name);
    entity.short_code.clone_from(&dto.short_code);
    entity.description.clone_from(&dto.description);
    entity.ean.clone_from(&dto.ean);
    entity.total_weight = dto.total_weight;
    entity.raw_product_id = dto.raw_product_id;
}

pub fn catalog_item_to_dto(entity: &CatalogItem, raw_product_name: &str) -> CatalogItemDto {
    CatalogItemDto {
        id: entity.id,
        name: entity.name.clone(),
        short_code: entity.short_code.clone(),
        description: entity.description.clone(),
        ean: entity.ean.clone(),
        total_weight: entity.total_weight,
        raw_product_id: entity.raw_product_id,
        raw_product_name: raw_product_name.to_string(),
    }
}
