//! Lazy accessors
//!
//! One [`LazyAccessor`] per lazy column. Reading a missing lazy column
//! issues a single secondary fetch for every lazy column the record still
//! lacks, merges the result and returns the requested value.

use crate::attributes::AttributeStore;
use crate::backend::ModelBackend;
use crate::errors::{LazyColumnsError, Result};
use crate::model::{LazyLoadable, ModelSchema};
use crate::scope::Projection;
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use lazycols_core_types::schema::OP_LAZY_FETCH;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Ordered, duplicate-free set of lazy column names for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyColumnSet {
    columns: Vec<String>,
}

impl LazyColumnSet {
    /// Build a set from `columns`; later duplicates are dropped
    pub fn new(columns: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            if !unique.contains(&column) {
                unique.push(column);
            }
        }
        Self { columns: unique }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Reader for a single lazy column of a declared model
#[derive(Debug, Clone)]
pub struct LazyAccessor {
    column: String,
    schema: Arc<ModelSchema>,
    lazy: Arc<LazyColumnSet>,
}

impl LazyAccessor {
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Read the column, fetching missing lazy columns first if needed
    ///
    /// Presence is checked on every call, so once the value is loaded no
    /// further fetch is issued.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if the row is gone from the data store
    /// - `MissingPrimaryKey` if the record has no primary key loaded
    /// - `ModelMismatch` if `record` belongs to another model
    /// - any backend error, unchanged
    pub fn read<'r, R, B>(&self, record: &'r mut R, backend: &B) -> Result<&'r Value>
    where
        R: LazyLoadable + ?Sized,
        B: ModelBackend + ?Sized,
    {
        ensure_model(&self.schema, &*record)?;

        if !record.attributes().contains(&self.column) {
            fetch_missing(&self.schema, &self.lazy, record, backend, &self.column)?;
        }

        record
            .attributes()
            .get(&self.column)
            .ok_or_else(|| LazyColumnsError::MissingAttribute {
                model: self.schema.name().to_string(),
                column: self.column.clone(),
            })
    }
}

/// Everything declared for one model: lazy set, narrowed scope, accessors
#[derive(Debug)]
pub struct LazyColumns {
    schema: Arc<ModelSchema>,
    lazy: Arc<LazyColumnSet>,
    default_projection: Projection,
    accessors: HashMap<String, LazyAccessor>,
}

impl LazyColumns {
    /// Build the declaration and one accessor per lazy column
    pub fn new(schema: ModelSchema, lazy: LazyColumnSet, default_projection: Projection) -> Self {
        let schema = Arc::new(schema);
        let lazy = Arc::new(lazy);
        let accessors = lazy
            .iter()
            .map(|column| {
                (
                    column.to_string(),
                    LazyAccessor {
                        column: column.to_string(),
                        schema: Arc::clone(&schema),
                        lazy: Arc::clone(&lazy),
                    },
                )
            })
            .collect();

        Self {
            schema,
            lazy,
            default_projection,
            accessors,
        }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn lazy_columns(&self) -> &LazyColumnSet {
        &self.lazy
    }

    /// The narrowed projection used by default loads of this model
    pub fn default_projection(&self) -> &Projection {
        &self.default_projection
    }

    pub fn accessor(&self, column: &str) -> Option<&LazyAccessor> {
        self.accessors.get(column)
    }

    pub fn is_lazy(&self, column: &str) -> bool {
        self.accessors.contains_key(column)
    }

    /// Read any column of the record
    ///
    /// Lazy columns go through their accessor; other columns are read from
    /// the attribute store as loaded.
    ///
    /// # Errors
    ///
    /// See [`LazyAccessor::read`]; a non-lazy column that was never loaded
    /// yields `MissingAttribute`.
    pub fn read_attribute<'r, R, B>(
        &self,
        record: &'r mut R,
        column: &str,
        backend: &B,
    ) -> Result<&'r Value>
    where
        R: LazyLoadable + ?Sized,
        B: ModelBackend + ?Sized,
    {
        if let Some(accessor) = self.accessors.get(column) {
            return accessor.read(record, backend);
        }

        ensure_model(&self.schema, &*record)?;
        record
            .attributes()
            .get(column)
            .ok_or_else(|| LazyColumnsError::MissingAttribute {
                model: self.schema.name().to_string(),
                column: column.to_string(),
            })
    }

    /// Load every lazy column the record is missing with one fetch
    ///
    /// Returns the number of columns merged; zero means no fetch was issued.
    ///
    /// # Errors
    ///
    /// Same as [`LazyAccessor::read`].
    pub fn load_all<R, B>(&self, record: &mut R, backend: &B) -> Result<usize>
    where
        R: LazyLoadable + ?Sized,
        B: ModelBackend + ?Sized,
    {
        ensure_model(&self.schema, &*record)?;
        let first_missing = self
            .lazy
            .iter()
            .find(|c| !record.attributes().contains(c))
            .map(str::to_string);
        match first_missing {
            Some(column) => fetch_missing(&self.schema, &self.lazy, record, backend, &column),
            None => Ok(0),
        }
    }
}

fn ensure_model<R: LazyLoadable + ?Sized>(schema: &ModelSchema, record: &R) -> Result<()> {
    if record.model_name() != schema.name() {
        return Err(LazyColumnsError::ModelMismatch {
            expected: schema.name().to_string(),
            actual: record.model_name().to_string(),
        });
    }
    Ok(())
}

/// Secondary fetch: load every missing lazy column by primary key
fn fetch_missing<R, B>(
    schema: &ModelSchema,
    lazy: &LazyColumnSet,
    record: &mut R,
    backend: &B,
    requested: &str,
) -> Result<usize>
where
    R: LazyLoadable + ?Sized,
    B: ModelBackend + ?Sized,
{
    let missing = record.attributes().missing_from(lazy.as_slice());
    if missing.is_empty() {
        return Ok(0);
    }

    let key = record
        .attributes()
        .get(schema.primary_key())
        .cloned()
        .ok_or_else(|| LazyColumnsError::MissingPrimaryKey {
            model: schema.name().to_string(),
            column: schema.primary_key().to_string(),
        })?;

    let start = Instant::now();
    log_op_start!(
        OP_LAZY_FETCH,
        model = schema.name(),
        column = requested,
        missing_len = missing.len()
    );

    let projection = Projection::columns(schema.table(), &missing);
    let fetched =
        match backend.fetch_by_primary_key(schema.table(), schema.primary_key(), &key, &projection) {
            Ok(Some(row)) => row,
            Ok(None) => {
                let err = LazyColumnsError::RecordNotFound {
                    model: schema.name().to_string(),
                    primary_key: key.to_string(),
                };
                log_op_error!(
                    OP_LAZY_FETCH,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    model = schema.name(),
                    primary_key = %key
                );
                return Err(err);
            }
            Err(err) => {
                log_op_error!(
                    OP_LAZY_FETCH,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    model = schema.name()
                );
                return Err(err);
            }
        };

    // Only the requested columns are merged, whatever else the host returned.
    let fetched: AttributeStore = missing
        .iter()
        .filter_map(|column| fetched.get(column).map(|v| (column.clone(), v.clone())))
        .collect();
    let merged = record.attributes_mut().merge_missing(fetched);

    log_op_end!(
        OP_LAZY_FETCH,
        duration_ms = start.elapsed().as_millis() as u64,
        model = schema.name(),
        merged = merged
    );
    Ok(merged)
}
