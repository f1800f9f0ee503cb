//! Input and output data transfer objects.
//!
//! # Responsibility
//! - Carry caller input into services (`Add*` / `Update*` requests).
//! - Carry read models back out, including denormalized parent names.
//!
//! # Invariants
//! - DTOs are plain data; validation lives in `crate::validation`.
//! - Output DTOs are never persisted.

pub mod catalog_item;
pub mod raw_product;
pub mod variety;
