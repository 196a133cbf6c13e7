//! Host ORM interface
//!
//! The lazy column machinery never talks to a data store directly. A host
//! implements [`ModelBackend`] to provide table introspection and the point
//! query used for secondary fetches.

use crate::attributes::AttributeStore;
use crate::errors::Result;
use crate::scope::Projection;
use crate::value::Value;

pub trait ModelBackend {
    /// Whether `table` exists in the data store
    ///
    /// # Errors
    ///
    /// Returns the data store error if the lookup itself fails.
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Column names of `table` in declaration order
    ///
    /// # Errors
    ///
    /// Returns the data store error if the table cannot be introspected.
    fn column_names(&self, table: &str) -> Result<Vec<String>>;

    /// Fetch one row by primary key, restricted to `projection`
    ///
    /// Must honour `projection` exactly and ignore any default scope the
    /// host may hold for the table. `Ok(None)` means no such row.
    ///
    /// # Errors
    ///
    /// Returns the data store error if the query fails.
    fn fetch_by_primary_key(
        &self,
        table: &str,
        primary_key: &str,
        key: &Value,
        projection: &Projection,
    ) -> Result<Option<AttributeStore>>;
}

impl<B: ModelBackend + ?Sized> ModelBackend for &B {
    fn table_exists(&self, table: &str) -> Result<bool> {
        (**self).table_exists(table)
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>> {
        (**self).column_names(table)
    }

    fn fetch_by_primary_key(
        &self,
        table: &str,
        primary_key: &str,
        key: &Value,
        projection: &Projection,
    ) -> Result<Option<AttributeStore>> {
        (**self).fetch_by_primary_key(table, primary_key, key, projection)
    }
}
