//! Catalog item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `catalog_items`, reads joined with the parent raw product name.
//! - Answer the global short-code uniqueness probe.

use super::{ensure_catalog_connection_ready, exclusion_param, parse_uuid, RepoError, RepoResult};
use crate::model::catalog_item::{CatalogItem, CatalogItemId};
use crate::model::raw_product::RawProductId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CATALOG_ITEM_RECORD_SELECT_SQL: &str = "SELECT
    ci.id AS id,
    ci.name AS name,
    ci.short_code AS short_code,
    ci.description AS description,
    ci.ean AS ean,
    ci.total_weight AS total_weight,
    ci.raw_product_id AS raw_product_id,
    rp.name AS raw_product_name
FROM catalog_items ci
INNER JOIN raw_products rp ON rp.id = ci.raw_product_id";

/// Filter for single catalog item reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogItemKey<'a> {
    Id(CatalogItemId),
    ShortCode(&'a str),
}

/// Catalog item row joined with its parent's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemRecord {
    pub item: CatalogItem,
    pub raw_product_name: String,
}

/// Repository interface for catalog items.
pub trait CatalogItemRepository {
    /// Lists catalog items, optionally restricted to one raw product.
    fn list_catalog_items(
        &self,
        raw_product_id: Option<RawProductId>,
    ) -> RepoResult<Vec<CatalogItemRecord>>;
    fn get_catalog_item(&self, key: CatalogItemKey<'_>) -> RepoResult<Option<CatalogItemRecord>>;
    fn short_code_in_use(
        &self,
        short_code: &str,
        excluding: Option<CatalogItemId>,
    ) -> RepoResult<bool>;
    fn insert_catalog_item(&self, item: &CatalogItem) -> RepoResult<()>;
    fn update_catalog_item(&self, item: &CatalogItem) -> RepoResult<()>;
    fn delete_catalog_item(&self, id: CatalogItemId) -> RepoResult<()>;
}

/// SQLite-backed catalog item repository.
pub struct SqliteCatalogItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogItemRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CatalogItemRepository for SqliteCatalogItemRepository<'_> {
    fn list_catalog_items(
        &self,
        raw_product_id: Option<RawProductId>,
    ) -> RepoResult<Vec<CatalogItemRecord>> {
        let mut sql = format!("{CATALOG_ITEM_RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(raw_product_id) = raw_product_id {
            sql.push_str(" AND ci.raw_product_id = ?");
            bind_values.push(Value::Text(raw_product_id.to_string()));
        }
        sql.push_str(" ORDER BY ci.short_code ASC, ci.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_catalog_item_record_row(row)?);
        }
        Ok(items)
    }

    fn get_catalog_item(&self, key: CatalogItemKey<'_>) -> RepoResult<Option<CatalogItemRecord>> {
        let (column, value) = match key {
            CatalogItemKey::Id(id) => ("ci.id", id.to_string()),
            CatalogItemKey::ShortCode(short_code) => ("ci.short_code", short_code.to_string()),
        };

        let mut stmt = self.conn.prepare(&format!(
            "{CATALOG_ITEM_RECORD_SELECT_SQL} WHERE {column} = ?1;"
        ))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_catalog_item_record_row(row)?));
        }
        Ok(None)
    }

    fn short_code_in_use(
        &self,
        short_code: &str,
        excluding: Option<CatalogItemId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM catalog_items
                WHERE short_code = ?1
                  AND id <> ?2
            );",
            params![short_code, exclusion_param(excluding)],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_catalog_item(&self, item: &CatalogItem) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO catalog_items (
                id,
                name,
                short_code,
                description,
                ean,
                total_weight,
                raw_product_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                item.id.to_string(),
                item.name.as_str(),
                item.short_code.as_str(),
                item.description.as_deref(),
                item.ean.as_deref(),
                item.total_weight,
                item.raw_product_id.to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_catalog_item(&self, item: &CatalogItem) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE catalog_items
             SET
                name = ?1,
                short_code = ?2,
                description = ?3,
                ean = ?4,
                total_weight = ?5,
                raw_product_id = ?6
             WHERE id = ?7;",
            params![
                item.name.as_str(),
                item.short_code.as_str(),
                item.description.as_deref(),
                item.ean.as_deref(),
                item.total_weight,
                item.raw_product_id.to_string(),
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }
        Ok(())
    }

    fn delete_catalog_item(&self, id: CatalogItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM catalog_items WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_catalog_item_record_row(row: &Row<'_>) -> RepoResult<CatalogItemRecord> {
    let id_text: String = row.get("id")?;
    let raw_product_id_text: String = row.get("raw_product_id")?;

    let total_weight: f64 = row.get("total_weight")?;
    if total_weight.is_nan() || total_weight <= 0.0 {
        return Err(RepoError::InvalidData(format!(
            "invalid total_weight `{total_weight}` in catalog_items.total_weight"
        )));
    }

    let item = CatalogItem {
        id: parse_uuid(&id_text, "catalog_items.id")?,
        name: row.get("name")?,
        short_code: row.get("short_code")?,
        description: row.get("description")?,
        ean: row.get("ean")?,
        total_weight,
        raw_product_id: parse_uuid(&raw_product_id_text, "catalog_items.raw_product_id")?,
    };

    Ok(CatalogItemRecord {
        item,
        raw_product_name: row.get("raw_product_name")?,
    })
}
