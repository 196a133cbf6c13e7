//! lazycols store - SQLite host for lazy column loading
//!
//! Provides:
//! - Connection helpers
//! - `SqliteBackend`, the `ModelBackend` implementation over rusqlite
//! - `ModelRepo`, scoped and unscoped record loading that honours the
//!   narrowed default projection of declared models

pub mod backend;
pub mod db;
pub mod errors;
pub mod repo;

// Re-export key types
pub use backend::{QueryStats, SqliteBackend};
pub use errors::Result;
pub use repo::{ModelRepo, Unscoped};
