//! Service-boundary failure taxonomy.
//!
//! # Invariants
//! - `Display` yields the human-readable message shown to callers.
//! - `kind()` is a stable tag callers can branch on.
//! - Storage details are reachable only through `source()` / `detail()`.

use crate::repo::raw_product_repo::RawProductDependents;
use crate::repo::RepoError;
use crate::validation::ValidationError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Catalog entity a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    RawProduct,
    Variety,
    CatalogItem,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawProduct => "RawProduct",
            Self::Variety => "Variety",
            Self::CatalogItem => "CatalogItem",
        }
    }
}

/// Stable failure tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    ValidationFailed,
    NotFound,
    DuplicateKey,
    HasDependents,
    Cancelled,
    StoreUpdateError,
    UnexpectedError,
}

impl ServiceErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::NotFound => "not_found",
            Self::DuplicateKey => "duplicate_key",
            Self::HasDependents => "has_dependents",
            Self::Cancelled => "cancelled",
            Self::StoreUpdateError => "store_update_error",
            Self::UnexpectedError => "unexpected_error",
        }
    }

    /// Whether the failure stems from caller input or request state rather
    /// than from the store.
    pub fn is_caller_error(self) -> bool {
        !matches!(self, Self::StoreUpdateError | Self::UnexpectedError)
    }
}

/// Typed failure returned by every service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// One or more input rules were violated.
    ValidationFailed(ValidationError),
    /// The addressed row does not exist.
    NotFound(EntityKind),
    /// The short code is taken within its uniqueness scope.
    DuplicateKey(EntityKind),
    /// A raw product cannot be deleted while rows still reference it.
    HasDependents(RawProductDependents),
    /// The caller cancelled the operation.
    Cancelled,
    /// The store rejected or failed a write.
    StoreUpdate(RepoError),
    /// Any other failure, typically on a read.
    Unexpected(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::ValidationFailed(_) => ServiceErrorKind::ValidationFailed,
            Self::NotFound(_) => ServiceErrorKind::NotFound,
            Self::DuplicateKey(_) => ServiceErrorKind::DuplicateKey,
            Self::HasDependents(_) => ServiceErrorKind::HasDependents,
            Self::Cancelled => ServiceErrorKind::Cancelled,
            Self::StoreUpdate(_) => ServiceErrorKind::StoreUpdateError,
            Self::Unexpected(_) => ServiceErrorKind::UnexpectedError,
        }
    }

    /// Caller message followed by the underlying cause, for diagnostics.
    pub fn detail(&self) -> String {
        match self.source() {
            Some(source) => format!("{self} ({source})"),
            None => self.to_string(),
        }
    }

    /// Translates a failure raised while reading.
    pub(crate) fn from_read(entity: EntityKind, err: RepoError) -> Self {
        match err {
            err if err.is_interrupted() => Self::Cancelled,
            RepoError::NotFound(_) => Self::NotFound(entity),
            other => Self::Unexpected(other),
        }
    }

    /// Translates a failure raised while committing a mutation.
    pub(crate) fn from_write(entity: EntityKind, err: RepoError) -> Self {
        match err {
            err if err.is_interrupted() => Self::Cancelled,
            RepoError::NotFound(_) => Self::NotFound(entity),
            other => Self::StoreUpdate(other),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{} not found.", entity.as_str()),
            Self::DuplicateKey(EntityKind::Variety) => {
                write!(f, "ShortCode is already in use for this RawProduct.")
            }
            Self::DuplicateKey(_) => write!(f, "ShortCode is already in use."),
            Self::HasDependents(dependents) => write!(
                f,
                "RawProduct is still referenced by {} varieties and {} catalog items.",
                dependents.varieties, dependents.catalog_items
            ),
            Self::Cancelled => write!(f, "The operation was cancelled."),
            Self::StoreUpdate(_) => write!(f, "Database update error."),
            Self::Unexpected(_) => write!(f, "Unexpected error occurred."),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(err) => Some(err),
            Self::StoreUpdate(err) => Some(err),
            Self::Unexpected(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateKey(_) | Self::HasDependents(_) | Self::Cancelled => {
                None
            }
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::ValidationFailed(value)
    }
}
