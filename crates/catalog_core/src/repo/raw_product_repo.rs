//! Raw product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `raw_products` plus the raw-product-with-varieties read.
//! - Answer the global short-code uniqueness probe.
//!
//! # Invariants
//! - Delete refuses to remove a raw product still referenced by varieties
//!   or catalog items.
//! - Aggregate children are ordered by `short_code ASC, id ASC`.

use super::{ensure_catalog_connection_ready, exclusion_param, parse_uuid, RepoError, RepoResult};
use crate::model::raw_product::{RawProduct, RawProductId};
use crate::model::variety::Variety;
use crate::repo::variety_repo::parse_variety_row;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const RAW_PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    short_code,
    description
FROM raw_products";

/// Lookup key for single raw product reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawProductKey<'a> {
    Id(RawProductId),
    ShortCode(&'a str),
}

/// Raw product loaded together with all its varieties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProductAggregate {
    pub raw_product: RawProduct,
    pub varieties: Vec<Variety>,
}

/// Number of rows referencing one raw product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawProductDependents {
    pub varieties: u64,
    pub catalog_items: u64,
}

impl RawProductDependents {
    pub fn is_empty(&self) -> bool {
        self.varieties == 0 && self.catalog_items == 0
    }
}

/// Delete outcome; restricted deletes leave storage untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawProductDeletion {
    Deleted,
    Restricted(RawProductDependents),
}

/// Repository interface for raw products.
pub trait RawProductRepository {
    /// Lists every raw product ordered by short code.
    fn list_raw_products(&self) -> RepoResult<Vec<RawProduct>>;
    /// Loads one raw product by id or short code.
    fn get_raw_product(&self, key: RawProductKey<'_>) -> RepoResult<Option<RawProduct>>;
    /// Loads one raw product and its varieties from a single read snapshot.
    fn get_raw_product_with_varieties(
        &self,
        key: RawProductKey<'_>,
    ) -> RepoResult<Option<RawProductAggregate>>;
    /// Whether another raw product already uses `short_code`.
    fn short_code_in_use(
        &self,
        short_code: &str,
        excluding: Option<RawProductId>,
    ) -> RepoResult<bool>;
    fn insert_raw_product(&self, raw_product: &RawProduct) -> RepoResult<()>;
    /// Overwrites all non-key columns; `NotFound` when the row vanished.
    fn update_raw_product(&self, raw_product: &RawProduct) -> RepoResult<()>;
    /// Hard-deletes a raw product unless dependents reference it.
    fn delete_raw_product(&self, id: RawProductId) -> RepoResult<RawProductDeletion>;
}

/// SQLite-backed raw product repository.
pub struct SqliteRawProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRawProductRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RawProductRepository for SqliteRawProductRepository<'_> {
    fn list_raw_products(&self) -> RepoResult<Vec<RawProduct>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RAW_PRODUCT_SELECT_SQL} ORDER BY short_code ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_raw_product_row(row)?);
        }
        Ok(items)
    }

    fn get_raw_product(&self, key: RawProductKey<'_>) -> RepoResult<Option<RawProduct>> {
        load_raw_product(self.conn, key)
    }

    fn get_raw_product_with_varieties(
        &self,
        key: RawProductKey<'_>,
    ) -> RepoResult<Option<RawProductAggregate>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(raw_product) = load_raw_product(&tx, key)? else {
            return Ok(None);
        };

        let mut varieties = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT
                    id,
                    name,
                    short_code,
                    description,
                    raw_product_id
                 FROM varieties
                 WHERE raw_product_id = ?1
                 ORDER BY short_code ASC, id ASC;",
            )?;
            let mut rows = stmt.query([raw_product.id.to_string()])?;
            while let Some(row) = rows.next()? {
                varieties.push(parse_variety_row(row)?);
            }
        }
        tx.commit()?;

        Ok(Some(RawProductAggregate {
            raw_product,
            varieties,
        }))
    }

    fn short_code_in_use(
        &self,
        short_code: &str,
        excluding: Option<RawProductId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM raw_products
                WHERE short_code = ?1
                  AND id <> ?2
            );",
            params![short_code, exclusion_param(excluding)],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_raw_product(&self, raw_product: &RawProduct) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO raw_products (
                id,
                name,
                short_code,
                description
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                raw_product.id.to_string(),
                raw_product.name.as_str(),
                raw_product.short_code.as_str(),
                raw_product.description.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn update_raw_product(&self, raw_product: &RawProduct) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE raw_products
             SET
                name = ?1,
                short_code = ?2,
                description = ?3
             WHERE id = ?4;",
            params![
                raw_product.name.as_str(),
                raw_product.short_code.as_str(),
                raw_product.description.as_deref(),
                raw_product.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(raw_product.id));
        }
        Ok(())
    }

    fn delete_raw_product(&self, id: RawProductId) -> RepoResult<RawProductDeletion> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let dependents = count_dependents(&tx, id)?;
        if !dependents.is_empty() {
            return Ok(RawProductDeletion::Restricted(dependents));
        }

        let changed = tx.execute("DELETE FROM raw_products WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        Ok(RawProductDeletion::Deleted)
    }
}

fn load_raw_product(conn: &Connection, key: RawProductKey<'_>) -> RepoResult<Option<RawProduct>> {
    let (sql, value) = match key {
        RawProductKey::Id(id) => (
            format!("{RAW_PRODUCT_SELECT_SQL} WHERE id = ?1;"),
            id.to_string(),
        ),
        RawProductKey::ShortCode(short_code) => (
            format!("{RAW_PRODUCT_SELECT_SQL} WHERE short_code = ?1;"),
            short_code.to_string(),
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([value])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_raw_product_row(row)?));
    }
    Ok(None)
}

fn count_dependents(conn: &Connection, id: RawProductId) -> RepoResult<RawProductDependents> {
    let id = id.to_string();
    let varieties: i64 = conn.query_row(
        "SELECT COUNT(*) FROM varieties WHERE raw_product_id = ?1;",
        [id.as_str()],
        |row| row.get(0),
    )?;
    let catalog_items: i64 = conn.query_row(
        "SELECT COUNT(*) FROM catalog_items WHERE raw_product_id = ?1;",
        [id.as_str()],
        |row| row.get(0),
    )?;

    Ok(RawProductDependents {
        varieties: varieties.unsigned_abs(),
        catalog_items: catalog_items.unsigned_abs(),
    })
}

fn parse_raw_product_row(row: &Row<'_>) -> RepoResult<RawProduct> {
    let id_text: String = row.get("id")?;
    Ok(RawProduct {
        id: parse_uuid(&id_text, "raw_products.id")?,
        name: row.get("name")?,
        short_code: row.get("short_code")?,
        description: row.get("description")?,
    })
}
