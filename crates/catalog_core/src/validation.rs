//! Input validation for catalog requests.
//!
//! # Responsibility
//! - Check presence, length and positivity rules on add/update DTOs.
//! - Report every violated rule at once, in declaration order.
//!
//! # Invariants
//! - Validation is pure: no storage access, no side effects.
//! - Lengths are counted in Unicode scalar values, not bytes.

use crate::dto::catalog_item::{AddCatalogItemDto, UpdateCatalogItemDto};
use crate::dto::raw_product::{AddRawProductDto, UpdateRawProductDto};
use crate::dto::variety::{AddVarietyDto, UpdateVarietyDto};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 100;
pub const SHORT_CODE_MAX_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 250;
pub const EAN_MAX_CHARS: usize = 13;

/// Aggregated rule violations for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    /// Violated rule messages, in declaration order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {}", self.messages.join("; "))
    }
}

impl Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_add_raw_product(dto: &AddRawProductDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.finish()
}

pub fn validate_update_raw_product(dto: &UpdateRawProductDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.required_id(dto.id, "Id is required.");
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.finish()
}

pub fn validate_add_variety(dto: &AddVarietyDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.required_id(dto.raw_product_id, "RawProductId is required.");
    rules.finish()
}

pub fn validate_update_variety(dto: &UpdateVarietyDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.required_id(dto.id, "Id is required.");
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.required_id(dto.raw_product_id, "RawProductId is required.");
    rules.finish()
}

pub fn validate_add_catalog_item(dto: &AddCatalogItemDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.catalog_item_fields(dto.ean.as_deref(), dto.total_weight);
    rules.required_id(dto.raw_product_id, "RawProductId is required.");
    rules.finish()
}

pub fn validate_update_catalog_item(dto: &UpdateCatalogItemDto) -> ValidationResult {
    let mut rules = Rules::default();
    rules.required_id(dto.id, "Id is required.");
    rules.common_fields(&dto.name, &dto.short_code, dto.description.as_deref());
    rules.catalog_item_fields(dto.ean.as_deref(), dto.total_weight);
    rules.required_id(dto.raw_product_id, "RawProductId is required.");
    rules.finish()
}

#[derive(Default)]
struct Rules {
    messages: Vec<String>,
}

impl Rules {
    fn common_fields(&mut self, name: &str, short_code: &str, description: Option<&str>) {
        self.required_text(name, "Name is required.");
        self.max_chars(name, NAME_MAX_CHARS, "Name cannot exceed 100 characters.");
        self.required_text(short_code, "ShortCode is required.");
        self.max_chars(
            short_code,
            SHORT_CODE_MAX_CHARS,
            "ShortCode cannot exceed 10 characters.",
        );
        if let Some(description) = description {
            self.max_chars(
                description,
                DESCRIPTION_MAX_CHARS,
                "Description cannot exceed 250 characters.",
            );
        }
    }

    fn catalog_item_fields(&mut self, ean: Option<&str>, total_weight: f64) {
        if let Some(ean) = ean {
            self.max_chars(ean, EAN_MAX_CHARS, "EAN cannot exceed 13 characters.");
        }
        if !total_weight.is_finite() || total_weight <= 0.0 {
            self.fail("Total weight must be greater than zero.");
        }
    }

    fn required_id(&mut self, id: Uuid, message: &'static str) {
        if id.is_nil() {
            self.fail(message);
        }
    }

    fn required_text(&mut self, value: &str, message: &'static str) {
        if value.trim().is_empty() {
            self.fail(message);
        }
    }

    fn max_chars(&mut self, value: &str, max: usize, message: &'static str) {
        if value.chars().count() > max {
            self.fail(message);
        }
    }

    fn fail(&mut self, message: &'static str) {
        self.messages.push(message.to_string());
    }

    fn finish(self) -> ValidationResult {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                messages: self.messages,
            })
        }
    }
}
