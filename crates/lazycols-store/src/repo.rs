//! Record loading through default and unscoped projections
//!
//! `ModelRepo::find` and `ModelRepo::all` use the model's default scope,
//! which is the narrowed projection once lazy columns are declared.
//! `unscoped()` bypasses it.

use crate::backend::SqliteBackend;
use crate::errors::Result;
use lazycols_core::errors::LazyColumnsError;
use lazycols_core::{
    LazyLoadable, LazyRegistry, ModelBackend, ModelSchema, Projection, Record, Value,
};
use rusqlite::Connection;

/// Query surface for records of registered models
pub struct ModelRepo<'c> {
    backend: SqliteBackend<'c>,
    registry: &'c LazyRegistry,
}

impl<'c> ModelRepo<'c> {
    pub fn new(conn: &'c Connection, registry: &'c LazyRegistry) -> Self {
        Self {
            backend: SqliteBackend::new(conn),
            registry,
        }
    }

    /// Repository bound to the process-wide registry
    pub fn with_global(conn: &'c Connection) -> Self {
        Self::new(conn, lazycols_core::global())
    }

    pub fn backend(&self) -> &SqliteBackend<'c> {
        &self.backend
    }

    pub fn registry(&self) -> &'c LazyRegistry {
        self.registry
    }

    /// Load one record through the default scope
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no row has this key, `Persistence` for
    /// SQLite failures.
    pub fn find(&self, schema: &ModelSchema, key: impl Into<Value>) -> Result<Record> {
        let projection = self.registry.default_projection(schema);
        self.find_projected(schema, key.into(), &projection)
    }

    /// Load every record through the default scope, ordered by primary key
    ///
    /// # Errors
    ///
    /// Returns `Persistence` for SQLite failures.
    pub fn all(&self, schema: &ModelSchema) -> Result<Vec<Record>> {
        let projection = self.registry.default_projection(schema);
        Ok(self
            .backend
            .fetch_all(schema.table(), schema.primary_key(), &projection)?
            .into_iter()
            .map(|attributes| Record::new(schema.name(), attributes))
            .collect())
    }

    /// Query builder that ignores the default scope
    pub fn unscoped(&self) -> Unscoped<'_, 'c> {
        Unscoped {
            repo: self,
            columns: None,
        }
    }

    /// Read a column, fetching lazy columns on first access
    ///
    /// Records of models without lazy columns are read as loaded.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` if the row disappeared before a lazy read,
    /// `MissingAttribute` for a column that is neither loaded nor lazy.
    pub fn read<'r, R>(&self, record: &'r mut R, column: &str) -> Result<&'r Value>
    where
        R: LazyLoadable + ?Sized,
    {
        let declared = self.registry.lookup(record.model_name());
        match declared {
            Some(columns) => columns.read_attribute(record, column, &self.backend),
            None => {
                let model = record.model_name().to_string();
                record
                    .attributes()
                    .get(column)
                    .ok_or_else(|| LazyColumnsError::MissingAttribute {
                        model,
                        column: column.to_string(),
                    })
            }
        }
    }

    /// Fetch every lazy column the record is missing in one query
    ///
    /// Returns the number of columns merged.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn load_lazy<R>(&self, record: &mut R) -> Result<usize>
    where
        R: LazyLoadable + ?Sized,
    {
        let declared = self.registry.lookup(record.model_name());
        match declared {
            Some(columns) => columns.load_all(record, &self.backend),
            None => Ok(0),
        }
    }

    fn find_projected(
        &self,
        schema: &ModelSchema,
        key: Value,
        projection: &Projection,
    ) -> Result<Record> {
        self.backend
            .fetch_by_primary_key(schema.table(), schema.primary_key(), &key, projection)?
            .map(|attributes| Record::new(schema.name(), attributes))
            .ok_or_else(|| LazyColumnsError::RecordNotFound {
                model: schema.name().to_string(),
                primary_key: key.to_string(),
            })
    }
}

/// Query that bypasses the default scope
pub struct Unscoped<'r, 'c> {
    repo: &'r ModelRepo<'c>,
    columns: Option<Vec<String>>,
}

impl Unscoped<'_, '_> {
    /// Restrict the query to `columns`
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = Some(columns.into_iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Load one record with the selected columns, or all of them
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no row has this key, `Persistence` for
    /// SQLite failures (unknown columns included).
    pub fn find(&self, schema: &ModelSchema, key: impl Into<Value>) -> Result<Record> {
        let projection = match &self.columns {
            Some(columns) => Projection::columns(schema.table(), columns),
            None => Projection::All,
        };
        self.repo.find_projected(schema, key.into(), &projection)
    }
}
