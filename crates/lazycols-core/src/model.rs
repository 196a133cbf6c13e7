//! Model schema and the lazy-loadable record capability

use crate::attributes::AttributeStore;
use serde::Serialize;

/// Primary key column assumed when a model does not name one
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Static description of a model: its name, table and primary key column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    name: String,
    table: String,
    primary_key: String,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

/// Capability of a record type whose columns can be loaded on demand
///
/// Implementors expose their attribute store; everything else (presence
/// checks, secondary fetch, merge) is driven by [`crate::LazyColumns`].
pub trait LazyLoadable {
    /// Name of the model this record belongs to
    fn model_name(&self) -> &str;

    fn attributes(&self) -> &AttributeStore;

    fn attributes_mut(&mut self) -> &mut AttributeStore;
}

/// Generic record: a model name plus its loaded attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    model: String,
    attributes: AttributeStore,
}

impl Record {
    pub fn new(model: impl Into<String>, attributes: AttributeStore) -> Self {
        Self {
            model: model.into(),
            attributes,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn into_attributes(self) -> AttributeStore {
        self.attributes
    }
}

impl LazyLoadable for Record {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_primary_key() {
        let schema = ModelSchema::new("Document", "documents");
        assert_eq!(schema.primary_key(), "id");

        let schema = schema.with_primary_key("doc_id");
        assert_eq!(schema.primary_key(), "doc_id");
    }
}
