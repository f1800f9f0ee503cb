//! Catalog item use-case service.
//!
//! # Invariants
//! - Short codes are unique across all catalog items.
//! - `total_weight` is validated positive before any storage access.

use crate::dto::catalog_item::{AddCatalogItemDto, CatalogItemDto, UpdateCatalogItemDto};
use crate::mapping;
use crate::model::catalog_item::CatalogItemId;
use crate::model::raw_product::RawProductId;
use crate::repo::catalog_item_repo::{CatalogItemKey, CatalogItemRecord, CatalogItemRepository};
use crate::service::cancel::CancellationToken;
use crate::service::error::{EntityKind, ServiceError, ServiceResult};
use crate::service::run_logged;
use crate::validation::{validate_add_catalog_item, validate_update_catalog_item};
use log::info;

const ENTITY: EntityKind = EntityKind::CatalogItem;

/// Catalog item service facade over a repository implementation.
pub struct CatalogItemService<R: CatalogItemRepository> {
    repo: R,
}

impl<R: CatalogItemRepository> CatalogItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_all(&self, cancel: &CancellationToken) -> ServiceResult<Vec<CatalogItemDto>> {
        run_logged("catalog_item_list", || self.list(None, cancel))
    }

    pub fn get_by_raw_product_id(
        &self,
        raw_product_id: RawProductId,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<CatalogItemDto>> {
        run_logged("catalog_item_list", || {
            self.list(Some(raw_product_id), cancel)
        })
    }

    pub fn get_by_id(
        &self,
        id: CatalogItemId,
        cancel: &CancellationToken,
    ) -> ServiceResult<CatalogItemDto> {
        run_logged("catalog_item_get", || {
            let record = self.load(CatalogItemKey::Id(id), cancel)?;
            Ok(to_dto(&record))
        })
    }

    pub fn get_by_code(
        &self,
        short_code: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<CatalogItemDto> {
        run_logged("catalog_item_get", || {
            let record = self.load(CatalogItemKey::ShortCode(short_code), cancel)?;
            Ok(to_dto(&record))
        })
    }

    /// Creates a catalog item and returns its generated id.
    pub fn add(
        &self,
        request: &AddCatalogItemDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<CatalogItemId> {
        run_logged("catalog_item_add", || {
            validate_add_catalog_item(request)?;
            self.ensure_short_code_free(&request.short_code, None, cancel)?;

            let item = mapping::catalog_item_from_add(request);
            cancel.check()?;
            self.repo
                .insert_catalog_item(&item)
                .map_err(|err| ServiceError::from_write(ENTITY, err))?;

            info!(
                "event=catalog_item_add module=service status=committed id={} raw_product_id={}",
                item.id, item.raw_product_id
            );
            Ok(item.id)
        })
    }

    pub fn update(
        &self,
        request: &UpdateCatalogItemDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        run_logged("catalog_item_update", || {
            validate_update_catalog_item(request)?;
            let mut item = self.load(CatalogItemKey::Id(request.id), cancel)?.item;
            self.ensure_short_code_free(&request.short_code, Some(request.id), cancel)?;

            mapping::apply_catalog_item_update(&mut item, request);
            cancel.check()?;
            self.repo
                .update_catalog_item(&item)
                .map_err(|err| ServiceError::from_write(ENTITY, err))
        })
    }

    pub fn delete_by_id(&self, id: CatalogItemId, cancel: &CancellationToken) -> ServiceResult<()> {
        run_logged("catalog_item_delete", || {
            self.load(CatalogItemKey::Id(id), cancel)?;
            cancel.check()?;
            self.repo
                .delete_catalog_item(id)
                .map_err(|err| ServiceError::from_write(ENTITY, err))
        })
    }

    fn list(
        &self,
        raw_product_id: Option<RawProductId>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<CatalogItemDto>> {
        cancel.check()?;
        let records = self
            .repo
            .list_catalog_items(raw_product_id)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?;
        Ok(records.iter().map(to_dto).collect())
    }

    fn load(
        &self,
        key: CatalogItemKey<'_>,
        cancel: &CancellationToken,
    ) -> ServiceResult<CatalogItemRecord> {
        cancel.check()?;
        self.repo
            .get_catalog_item(key)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?
            .ok_or(ServiceError::NotFound(ENTITY))
    }

    fn ensure_short_code_free(
        &self,
        short_code: &str,
        excluding: Option<CatalogItemId>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        cancel.check()?;
        let in_use = self
            .repo
            .short_code_in_use(short_code, excluding)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?;
        if in_use {
            return Err(ServiceError::DuplicateKey(ENTITY));
        }
        Ok(())
    }
}

fn to_dto(record: &CatalogItemRecord) -> CatalogItemDto {
    mapping::catalog_item_to_dto(&record.item, &record.raw_product_name)
}
