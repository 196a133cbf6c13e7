//! Error helpers for lazycols-store
//!
//! Data store failures are surfaced as `Persistence` with the SQLite
//! message unchanged.

use lazycols_core::errors::LazyColumnsError;

/// Result type alias using LazyColumnsError
pub type Result<T> = std::result::Result<T, LazyColumnsError>;

/// Wrap a rusqlite error
pub fn from_rusqlite(err: rusqlite::Error) -> LazyColumnsError {
    LazyColumnsError::Persistence {
        message: err.to_string(),
    }
}

/// Create an invalid identifier error
pub fn invalid_identifier(identifier: &str) -> LazyColumnsError {
    LazyColumnsError::InvalidIdentifier {
        identifier: identifier.to_string(),
    }
}
