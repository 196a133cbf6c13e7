//! SQLite implementation of the host model backend

use crate::errors::{from_rusqlite, invalid_identifier, Result};
use lazycols_core::errors::LazyColumnsError;
use lazycols_core::{AttributeStore, ModelBackend, ModelSchema, Projection, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::cell::Cell;

/// Counters of queries issued through one backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Single-row lookups by primary key (secondary fetches included)
    pub point_queries: u64,
    /// Full-table loads
    pub scans: u64,
}

/// `ModelBackend` over a borrowed rusqlite connection
pub struct SqliteBackend<'c> {
    conn: &'c Connection,
    stats: Cell<QueryStats>,
}

impl<'c> SqliteBackend<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            stats: Cell::new(QueryStats::default()),
        }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }

    pub fn stats(&self) -> QueryStats {
        self.stats.get()
    }

    /// Build a schema for `table`, taking the primary key from the table
    ///
    /// Falls back to `id` when the table declares no single-column key.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the table cannot be introspected.
    pub fn introspect(&self, model: &str, table: &str) -> Result<ModelSchema> {
        let schema = ModelSchema::new(model, table);
        match self.primary_key_column(table)? {
            Some(primary_key) => Ok(schema.with_primary_key(primary_key)),
            None => Ok(schema),
        }
    }

    /// Primary key column of `table`, if it has exactly one
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the pragma fails.
    pub fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        let keys: Vec<String> = self
            .table_info(table)?
            .into_iter()
            .filter(|(_, pk)| *pk > 0)
            .map(|(name, _)| name)
            .collect();
        Ok(match keys.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        })
    }

    /// Load every row of `table` restricted to `projection`, ordered by key
    ///
    /// # Errors
    ///
    /// Returns `Persistence` for any SQLite failure, including projections
    /// that name columns the table does not have.
    pub fn fetch_all(
        &self,
        table: &str,
        primary_key: &str,
        projection: &Projection,
    ) -> Result<Vec<AttributeStore>> {
        let columns = self.resolve_projection(table, projection)?;
        let sql = format!(
            "{} ORDER BY {}.{}",
            select_sql(table, &columns)?,
            quote(table)?,
            quote(primary_key)?
        );
        self.bump(|stats| stats.scans += 1);

        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| read_row(row, &columns))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn table_info(&self, table: &str) -> Result<Vec<(String, i64)>> {
        let sql = format!("PRAGMA table_info({})", quote(table)?);
        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(5)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn resolve_projection(&self, table: &str, projection: &Projection) -> Result<Vec<String>> {
        match projection.column_names() {
            Some(names) => Ok(names.into_iter().map(String::from).collect()),
            None => self.column_names(table),
        }
    }

    fn bump(&self, f: impl FnOnce(&mut QueryStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl ModelBackend for SqliteBackend<'_> {
    fn table_exists(&self, table: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(from_rusqlite)
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>> {
        Ok(self
            .table_info(table)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn fetch_by_primary_key(
        &self,
        table: &str,
        primary_key: &str,
        key: &Value,
        projection: &Projection,
    ) -> Result<Option<AttributeStore>> {
        let columns = self.resolve_projection(table, projection)?;
        let sql = format!(
            "{} WHERE {}.{} = ?1",
            select_sql(table, &columns)?,
            quote(table)?,
            quote(primary_key)?
        );
        self.bump(|stats| stats.point_queries += 1);
        tracing::trace!(sql = %sql, "point query");

        self.conn
            .query_row(&sql, params_from_iter([to_sql(key)]), |row| {
                read_row(row, &columns)
            })
            .optional()
            .map_err(from_rusqlite)
    }
}

/// `SELECT "t"."a", "t"."b" FROM "t"`
fn select_sql(table: &str, columns: &[String]) -> Result<String> {
    if columns.is_empty() {
        return Err(LazyColumnsError::Persistence {
            message: format!("empty projection on table {}", table),
        });
    }
    let table_ident = quote(table)?;
    let list = columns
        .iter()
        .map(|c| -> Result<String> { Ok(format!("{}.{}", table_ident, quote(c)?)) })
        .collect::<Result<Vec<_>>>()?
        .join(", ");
    Ok(format!("SELECT {} FROM {}", list, table_ident))
}

/// Double-quote an identifier, doubling embedded quotes
///
/// Empty names and names containing NUL cannot be expressed and are rejected.
fn quote(identifier: &str) -> Result<String> {
    if identifier.is_empty() || identifier.contains('\0') {
        return Err(invalid_identifier(identifier));
    }
    Ok(format!("\"{}\"", identifier.replace('"', "\"\"")))
}

fn read_row(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<AttributeStore> {
    let mut attributes = AttributeStore::new();
    for (idx, column) in columns.iter().enumerate() {
        attributes.insert(column.as_str(), from_sql(row.get_ref(idx)?));
    }
    Ok(attributes)
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}
