//! Variety repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `varieties`, reads joined with the parent raw product name.
//! - Answer the parent-scoped short-code uniqueness probe.
//!
//! # Invariants
//! - Uniqueness is checked on the `(short_code, raw_product_id)` pair.
//! - Lists are ordered by `short_code ASC, id ASC`.

use super::{ensure_catalog_connection_ready, exclusion_param, parse_uuid, RepoError, RepoResult};
use crate::model::raw_product::RawProductId;
use crate::model::variety::{Variety, VarietyId};
use rusqlite::{params, Connection, Row};

const VARIETY_RECORD_SELECT_SQL: &str = "SELECT
    v.id AS id,
    v.name AS name,
    v.short_code AS short_code,
    v.description AS description,
    v.raw_product_id AS raw_product_id,
    rp.name AS raw_product_name
FROM varieties v
INNER JOIN raw_products rp ON rp.id = v.raw_product_id";

/// Variety row joined with its parent's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarietyRecord {
    pub variety: Variety,
    pub raw_product_name: String,
}

/// Repository interface for varieties.
pub trait VarietyRepository {
    /// Lists varieties, optionally restricted to one raw product.
    fn list_varieties(&self, raw_product_id: Option<RawProductId>)
        -> RepoResult<Vec<VarietyRecord>>;
    fn get_variety(&self, id: VarietyId) -> RepoResult<Option<VarietyRecord>>;
    /// Loads the variety using `short_code` under `raw_product_id`.
    fn get_variety_by_code(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
    ) -> RepoResult<Option<VarietyRecord>>;
    /// Whether another variety of `raw_product_id` already uses `short_code`.
    fn short_code_in_use(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
        excluding: Option<VarietyId>,
    ) -> RepoResult<bool>;
    fn insert_variety(&self, variety: &Variety) -> RepoResult<()>;
    fn update_variety(&self, variety: &Variety) -> RepoResult<()>;
    fn delete_variety(&self, id: VarietyId) -> RepoResult<()>;
}

/// SQLite-backed variety repository.
pub struct SqliteVarietyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVarietyRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_records(&self, sql: &str, value: Option<String>) -> RepoResult<Vec<VarietyRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match value {
            Some(value) => stmt.query([value])?,
            None => stmt.query([])?,
        };

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_variety_record_row(row)?);
        }
        Ok(items)
    }
}

impl VarietyRepository for SqliteVarietyRepository<'_> {
    fn list_varieties(
        &self,
        raw_product_id: Option<RawProductId>,
    ) -> RepoResult<Vec<VarietyRecord>> {
        match raw_product_id {
            Some(raw_product_id) => self.query_records(
                &format!(
                    "{VARIETY_RECORD_SELECT_SQL}
                     WHERE v.raw_product_id = ?1
                     ORDER BY v.short_code ASC, v.id ASC;"
                ),
                Some(raw_product_id.to_string()),
            ),
            None => self.query_records(
                &format!("{VARIETY_RECORD_SELECT_SQL} ORDER BY v.short_code ASC, v.id ASC;"),
                None,
            ),
        }
    }

    fn get_variety(&self, id: VarietyId) -> RepoResult<Option<VarietyRecord>> {
        let records = self.query_records(
            &format!("{VARIETY_RECORD_SELECT_SQL} WHERE v.id = ?1;"),
            Some(id.to_string()),
        )?;
        Ok(records.into_iter().next())
    }

    fn get_variety_by_code(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
    ) -> RepoResult<Option<VarietyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{VARIETY_RECORD_SELECT_SQL}
             WHERE v.short_code = ?1
               AND v.raw_product_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![short_code, raw_product_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_variety_record_row(row)?));
        }
        Ok(None)
    }

    fn short_code_in_use(
        &self,
        short_code: &str,
        raw_product_id: RawProductId,
        excluding: Option<VarietyId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM varieties
                WHERE short_code = ?1
                  AND raw_product_id = ?2
                  AND id <> ?3
            );",
            params![
                short_code,
                raw_product_id.to_string(),
                exclusion_param(excluding)
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_variety(&self, variety: &Variety) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO varieties (
                id,
                name,
                short_code,
                description,
                raw_product_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                variety.id.to_string(),
                variety.name.as_str(),
                variety.short_code.as_str(),
                variety.description.as_deref(),
                variety.raw_product_id.to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_variety(&self, variety: &Variety) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE varieties
             SET
                name = ?1,
                short_code = ?2,
                description = ?3,
                raw_product_id = ?4
             WHERE id = ?5;",
            params![
                variety.name.as_str(),
                variety.short_code.as_str(),
                variety.description.as_deref(),
                variety.raw_product_id.to_string(),
                variety.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(variety.id));
        }
        Ok(())
    }

    fn delete_variety(&self, id: VarietyId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM varieties WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Parses a bare `varieties` row (no joined columns).
pub(crate) fn parse_variety_row(row: &Row<'_>) -> RepoResult<Variety> {
    let id_text: String = row.get("id")?;
    let raw_product_id_text: String = row.get("raw_product_id")?;
    Ok(Variety {
        id: parse_uuid(&id_text, "varieties.id")?,
        name: row.get("name")?,
        short_code: row.get("short_code")?,
        description: row.get("description")?,
        raw_product_id: parse_uuid(&raw_product_id_text, "varieties.raw_product_id")?,
    })
}

fn parse_variety_record_row(row: &Row<'_>) -> RepoResult<VarietyRecord> {
    Ok(VarietyRecord {
        variety: parse_variety_row(row)?,
        raw_product_name: row.get("raw_product_name")?,
    })
}
