//! Variety use-case service.
//!
//! # Invariants
//! - Short codes are unique per raw product, not globally.
//! - Moving a variety to another raw product re-checks uniqueness in the
//!   target raw product.

use crate::dto::variety::{AddVarietyDto, UpdateVarietyDto, VarietyDto};
use crate::mapping;
use crate::model::raw_product::RawProductId;
use crate::model::variety::VarietyId;
use crate::repo::variety_repo::{VarietyRecord, VarietyRepository};
use crate::service::cancel::CancellationToken;
use crate::service::error::{EntityKind, ServiceError, ServiceResult};
use crate::service::run_logged;
use crate::validation::{validate_add_variety, validate_update_variety};
use log::info;

const ENTITY: EntityKind = EntityKind::Variety;

/// Variety service facade over a repository implementation.
pub struct VarietyService<R: VarietyRepository> {
    repo: R,
}

impl<R: VarietyRepository> VarietyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_all(&self, cancel: &CancellationToken) -> ServiceResult<Vec<VarietyDto>> {
        run_logged("variety_list", || self.list(None, cancel))
    }

    /// Lists the varieties of one raw product. An unknown raw product simply
    /// has no varieties.
    pub fn get_by_raw_product_id(
        &self,
        raw_product_id: RawProductId,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<VarietyDto>> {
        run_logged("variety_list", || self.list(Some(raw_product_id), cancel))
    }

    pub fn get_by_id(&self, id: VarietyId, cancel: &CancellationToken) -> ServiceResult<VarietyDto> {
        run_logged("variety_get", || {
            let record = self.load(id, cancel)?;
            Ok(to_dto(&record))
        })
    }

    /// Looks up a variety by short code within one raw product.
    pub fn get_by_code(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
        cancel: &CancellationToken,
    ) -> ServiceResult<VarietyDto> {
        run_logged("variety_get", || {
            cancel.check()?;
            let record = self
                .repo
                .get_variety_by_code(short_code, raw_product_id)
                .map_err(|err| ServiceError::from_read(ENTITY, err))?
                .ok_or(ServiceError::NotFound(ENTITY))?;
            Ok(to_dto(&record))
        })
    }

    /// Creates a variety and returns its generated id.
    ///
    /// An unknown `raw_product_id` is rejected by the store's foreign key and
    /// surfaces as `StoreUpdate`.
    pub fn add(
        &self,
        request: &AddVarietyDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<VarietyId> {
        run_logged("variety_add", || {
            validate_add_variety(request)?;
            self.ensure_short_code_free(
                &request.short_code,
                request.raw_product_id,
                None,
                cancel,
            )?;

            let variety = mapping::variety_from_add(request);
            cancel.check()?;
            self.repo
                .insert_variety(&variety)
                .map_err(|err| ServiceError::from_write(ENTITY, err))?;

            info!(
                "event=variety_add module=service status=committed id={} raw_product_id={}",
                variety.id, variety.raw_product_id
            );
            Ok(variety.id)
        })
    }

    pub fn update(&self, request: &UpdateVarietyDto, cancel: &CancellationToken) -> ServiceResult<()> {
        run_logged("variety_update", || {
            validate_update_variety(request)?;
            let mut variety = self.load(request.id, cancel)?.variety;
            self.ensure_short_code_free(
                &request.short_code,
                request.raw_product_id,
                Some(request.id),
                cancel,
            )?;

            mapping::apply_variety_update(&mut variety, request);
            cancel.check()?;
            self.repo
                .update_variety(&variety)
                .map_err(|err| ServiceError::from_write(ENTITY, err))
        })
    }

    pub fn delete_by_id(&self, id: VarietyId, cancel: &CancellationToken) -> ServiceResult<()> {
        run_logged("variety_delete", || {
            self.load(id, cancel)?;
            cancel.check()?;
            self.repo
                .delete_variety(id)
                .map_err(|err| ServiceError::from_write(ENTITY, err))
        })
    }

    fn list(
        &self,
        raw_product_id: Option<RawProductId>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<VarietyDto>> {
        cancel.check()?;
        let records = self
            .repo
            .list_varieties(raw_product_id)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?;
        Ok(records.iter().map(to_dto).collect())
    }

    fn load(&self, id: VarietyId, cancel: &CancellationToken) -> ServiceResult<VarietyRecord> {
        cancel.check()?;
        self.repo
            .get_variety(id)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?
            .ok_or(ServiceError::NotFound(ENTITY))
    }

    fn ensure_short_code_free(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
        excluding: Option<VarietyId>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        cancel.check()?;
        let in_use = self
            .repo
            .short_code_in_use(short_code, raw_product_id, excluding)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?;
        if in_use {
            return Err(ServiceError::DuplicateKey(ENTITY));
        }
        Ok(())
    }
}

fn to_dto(record: &VarietyRecord) -> VarietyDto {
    mapping::variety_to_dto(&record.variety, &record.raw_product_name)
}
