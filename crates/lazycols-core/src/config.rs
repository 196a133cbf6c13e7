//! Declarative lazy column configuration
//!
//! ```toml
//! [[models]]
//! name = "Document"
//! table = "documents"
//! lazy = ["body", "thumbnail"]
//! ```

use crate::errors::{LazyColumnsError, Result};
use crate::model::{ModelSchema, DEFAULT_PRIMARY_KEY};
use serde::Deserialize;
use std::path::Path;

/// Lazy column declarations for a set of models
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LazyConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// One model's declaration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub table: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    pub lazy: Vec<String>,
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

impl ModelConfig {
    pub fn schema(&self) -> ModelSchema {
        ModelSchema::new(&self.name, &self.table).with_primary_key(&self.primary_key)
    }
}

impl LazyConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Config` if the document is not valid TOML or has an
    /// unexpected shape.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| LazyColumnsError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&source)
    }
}
