//! Shared declaration arguments
//!
//! Both commands declare lazy columns the same way: from `--lazy` flags
//! or from a TOML config file.

use clap::Args;
use lazycols_core::{Declaration, LazyConfig, ModelSchema};
use lazycols_store::SqliteBackend;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Path to the SQLite database
    #[arg(long)]
    pub db: PathBuf,

    /// Table backing the model
    #[arg(long)]
    pub table: String,

    /// Model name (defaults to the table name)
    #[arg(long)]
    pub model: Option<String>,

    /// Lazy column; repeat or separate with commas
    #[arg(long, value_delimiter = ',', conflicts_with = "config")]
    pub lazy: Vec<String>,

    /// TOML file with lazy column declarations
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ModelArgs {
    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or(&self.table)
    }
}

/// Install the global registry and declare lazy columns for the model
///
/// Returns the model's schema as the database describes it.
pub fn declare(
    args: &ModelArgs,
    backend: &SqliteBackend<'_>,
) -> Result<ModelSchema, Box<dyn std::error::Error>> {
    let registry = lazycols_core::global();
    registry.install();

    let schema = match &args.config {
        Some(path) => {
            let config = LazyConfig::load(path)?;
            registry.declare_from_config(backend, &config)?;
            config
                .models
                .iter()
                .find(|m| m.name == args.model_name() || m.table == args.table)
                .map(|m| m.schema())
                .ok_or_else(|| format!("model {} is not in {}", args.model_name(), path.display()))?
        }
        None => {
            let schema = backend.introspect(args.model_name(), &args.table)?;
            if !args.lazy.is_empty() {
                if let Declaration::TableMissing = registry.lazy_load(backend, &schema, &args.lazy)? {
                    return Err(format!("table {} does not exist", args.table).into());
                }
            }
            schema
        }
    };

    Ok(schema)
}
