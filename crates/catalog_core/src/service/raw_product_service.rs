//! Raw product use-case service.
//!
//! # Responsibility
//! - CRUD entry points for raw products plus the variety aggregate read.
//!
//! # Invariants
//! - Short codes are unique across all raw products; an update may keep
//!   its own current short code.
//! - Delete is restricted while varieties or catalog items reference the
//!   raw product.

use crate::dto::raw_product::{
    AddRawProductDto, RawProductDto, RawProductWithVarietiesDto, UpdateRawProductDto,
};
use crate::mapping;
use crate::model::raw_product::{RawProduct, RawProductId};
use crate::repo::raw_product_repo::{RawProductDeletion, RawProductKey, RawProductRepository};
use crate::service::cancel::CancellationToken;
use crate::service::error::{EntityKind, ServiceError, ServiceResult};
use crate::service::run_logged;
use crate::validation::{validate_add_raw_product, validate_update_raw_product};
use log::{debug, info};

const ENTITY: EntityKind = EntityKind::RawProduct;

/// Raw product service facade over a repository implementation.
pub struct RawProductService<R: RawProductRepository> {
    repo: R,
}

impl<R: RawProductRepository> RawProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all raw products. An empty catalog is a success.
    pub fn get_all(&self, cancel: &CancellationToken) -> ServiceResult<Vec<RawProductDto>> {
        run_logged("raw_product_list", || {
            cancel.check()?;
            let items = self
                .repo
                .list_raw_products()
                .map_err(|err| ServiceError::from_read(ENTITY, err))?;
            debug!("event=raw_product_list module=service count={}", items.len());
            Ok(items.iter().map(mapping::raw_product_to_dto).collect())
        })
    }

    pub fn get_by_id(
        &self,
        id: RawProductId,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductDto> {
        run_logged("raw_product_get", || {
            let raw_product = self.load(RawProductKey::Id(id), cancel)?;
            Ok(mapping::raw_product_to_dto(&raw_product))
        })
    }

    /// Looks a raw product up by its exact, case-sensitive short code.
    pub fn get_by_code(
        &self,
        short_code: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductDto> {
        run_logged("raw_product_get", || {
            let raw_product = self.load(RawProductKey::ShortCode(short_code), cancel)?;
            Ok(mapping::raw_product_to_dto(&raw_product))
        })
    }

    /// Loads a raw product with its varieties.
    ///
    /// A raw product without varieties yields an empty `varieties` list.
    pub fn get_with_varieties_by_id(
        &self,
        id: RawProductId,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductWithVarietiesDto> {
        run_logged("raw_product_aggregate_get", || {
            self.load_aggregate(RawProductKey::Id(id), cancel)
        })
    }

    pub fn get_with_varieties_by_code(
        &self,
        short_code: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductWithVarietiesDto> {
        run_logged("raw_product_aggregate_get", || {
            self.load_aggregate(RawProductKey::ShortCode(short_code), cancel)
        })
    }

    /// Creates a raw product and returns its generated id.
    ///
    /// # Errors
    /// - `ValidationFailed` before any storage access.
    /// - `DuplicateKey` when the short code is taken; nothing is written.
    /// - `StoreUpdate` when the insert itself fails.
    pub fn add(
        &self,
        request: &AddRawProductDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductId> {
        run_logged("raw_product_add", || {
            validate_add_raw_product(request)?;
            self.ensure_short_code_free(&request.short_code, None, cancel)?;

            let raw_product = mapping::raw_product_from_add(request);
            cancel.check()?;
            self.repo
                .insert_raw_product(&raw_product)
                .map_err(|err| ServiceError::from_write(ENTITY, err))?;

            info!(
                "event=raw_product_add module=service status=committed id={}",
                raw_product.id
            );
            Ok(raw_product.id)
        })
    }

    /// Overwrites name, short code and description of an existing raw product.
    pub fn update(
        &self,
        request: &UpdateRawProductDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        run_logged("raw_product_update", || {
            validate_update_raw_product(request)?;
            let mut raw_product = self.load(RawProductKey::Id(request.id), cancel)?;
            self.ensure_short_code_free(&request.short_code, Some(request.id), cancel)?;

            mapping::apply_raw_product_update(&mut raw_product, request);
            cancel.check()?;
            self.repo
                .update_raw_product(&raw_product)
                .map_err(|err| ServiceError::from_write(ENTITY, err))
        })
    }

    /// Hard-deletes a raw product that nothing references any more.
    pub fn delete_by_id(&self, id: RawProductId, cancel: &CancellationToken) -> ServiceResult<()> {
        run_logged("raw_product_delete", || {
            self.load(RawProductKey::Id(id), cancel)?;
            cancel.check()?;

            match self
                .repo
                .delete_raw_product(id)
                .map_err(|err| ServiceError::from_write(ENTITY, err))?
            {
                RawProductDeletion::Deleted => Ok(()),
                RawProductDeletion::Restricted(dependents) => {
                    Err(ServiceError::HasDependents(dependents))
                }
            }
        })
    }

    fn load(&self, key: RawProductKey<'_>, cancel: &CancellationToken) -> ServiceResult<RawProduct> {
        cancel.check()?;
        self.repo
            .get_raw_product(key)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?
            .ok_or(ServiceError::NotFound(ENTITY))
    }

    fn load_aggregate(
        &self,
        key: RawProductKey<'_>,
        cancel: &CancellationToken,
    ) -> ServiceResult<RawProductWithVarietiesDto> {
        cancel.check()?;
        let aggregate = self
            .repo
            .get_raw_product_with_varieties(key)
            .map_err(|err| ServiceError::from_read(ENTITY, err))?
            .ok_or(ServiceError::NotFound(ENTITY))?;
        Ok(mapping::raw_product_with_varieties(
            &aggregate.raw_product,
            &aggregate.varieties,
        ))
    }

    fn ensure_short_code_free(
        &self,
        short_code: &str,
        excluding: Option<RawProductId>,
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
