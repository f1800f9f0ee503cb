//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate validate, uniqueness-check, map, persist for each entity.
//! - Translate every lower-layer failure into a typed `ServiceError`.
//!
//! # Invariants
//! - No service call panics or leaks a repository error untranslated.
//! - A triggered cancellation token stops the call before its next I/O step.
//! - Services remain storage-agnostic; SQL stays in `crate::repo`.

pub mod cancel;
pub mod catalog_item_service;
pub mod error;
pub mod raw_product_service;
pub mod variety_service;

use error::ServiceResult;
use log::{error, info, warn};
use std::time::Instant;

/// Runs one service operation and emits its outcome event.
///
/// Expected failures (validation, not found, duplicates, cancellation) log
/// at `warn`; store and unexpected failures log at `error`.
fn run_logged<T>(
    event: &'static str,
    operation: impl FnOnce() -> ServiceResult<T>,
) -> ServiceResult<T> {
    let started_at = Instant::now();
    let result = operation();
    let duration_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) if err.kind().is_caller_error() => warn!(
            "event={event} module=service status=rejected duration_ms={duration_ms} error_code={}",
            err.kind().as_str()
        ),
        Err(err) => error!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={}",
            err.kind().as_str(),
            err.detail()
        ),
    }
    result
}
