//! Catalog entity model.
//!
//! # Responsibility
//! - Define the persisted records behind raw products, varieties and
//!   catalog items.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at creation.
//! - Varieties and catalog items always reference exactly one raw product.
//! - Deletion is a hard delete; there are no tombstones.

pub mod catalog_item;
pub mod raw_product;
pub mod variety;
