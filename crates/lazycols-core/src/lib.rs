//! lazycols core - lazy column loading for record models
//!
//! A model declares some of its columns as lazy. Those columns are dropped
//! from the model's default projection and fetched on first read:
//!
//! - [`registry`] holds the process-wide declarations (`lazy_load`)
//! - [`scope`] narrows the default projection to the non-lazy columns
//! - [`accessor`] performs the secondary fetch and merges missing columns
//! - [`backend`] is the interface a host ORM implements to take part
//!
//! The SQLite host lives in `lazycols-store`.

pub mod accessor;
pub mod attributes;
pub mod backend;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod scope;
pub mod value;

// Re-export commonly used types
pub use accessor::{LazyAccessor, LazyColumnSet, LazyColumns};
pub use attributes::AttributeStore;
pub use backend::ModelBackend;
pub use config::{LazyConfig, ModelConfig};
pub use errors::{ExError, ExErrorKind, LazyColumnsError, Result};
pub use model::{LazyLoadable, ModelSchema, Record};
pub use registry::{global, Activation, Declaration, LazyRegistry};
pub use scope::{Projection, QualifiedColumn};
pub use value::Value;
