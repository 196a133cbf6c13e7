use lazycols_core_types::schema::{OP_LAZY_FETCH, OP_LAZY_LOAD, OP_READ_ATTRIBUTE};
use thiserror::Error;

/// Result type alias using LazyColumnsError
pub type Result<T> = std::result::Result<T, LazyColumnsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling
/// and test assertions, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Declaration
    NotInstalled,
    EmptyLazySet,
    PrimaryKeyDeclaredLazy,
    UnknownColumn,
    AlreadyDeclared,
    InvalidIdentifier,

    // Record access
    NotFound,
    MissingAttribute,
    MissingPrimaryKey,
    ModelMismatch,

    // Integration
    Config,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotInstalled => "ERR_NOT_INSTALLED",
            ExErrorKind::EmptyLazySet => "ERR_EMPTY_LAZY_SET",
            ExErrorKind::PrimaryKeyDeclaredLazy => "ERR_PRIMARY_KEY_DECLARED_LAZY",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::AlreadyDeclared => "ERR_ALREADY_DECLARED",
            ExErrorKind::InvalidIdentifier => "ERR_INVALID_IDENTIFIER",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MissingAttribute => "ERR_MISSING_ATTRIBUTE",
            ExErrorKind::MissingPrimaryKey => "ERR_MISSING_PRIMARY_KEY",
            ExErrorKind::ModelMismatch => "ERR_MODEL_MISMATCH",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the model/column context the failure
/// happened in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    model: Option<String>,
    column: Option<String>,
    primary_key: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            model: None,
            column: None,
            primary_key: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add model context
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add primary key context
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(model) = &self.model {
            write!(f, " (model: {})", model)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(primary_key) = &self.primary_key {
            write!(f, " (primary_key: {})", primary_key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for lazy column declaration and loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LazyColumnsError {
    // ===== Declaration Errors =====
    /// `lazy_load` was called before the registry was installed
    #[error("Lazy columns registry is not installed")]
    NotInstalled,

    /// Declaration named no columns
    #[error("No lazy columns declared for model {model}")]
    EmptyLazySet { model: String },

    /// The primary key is needed for the secondary fetch and cannot be lazy
    #[error("Primary key column {column} of model {model} cannot be lazy")]
    PrimaryKeyDeclaredLazy { model: String, column: String },

    /// Column is not part of the model's table
    #[error("Unknown column {column} for model {model}")]
    UnknownColumn { model: String, column: String },

    /// Lazy columns are write-once per model
    #[error("Lazy columns already declared for model {model}")]
    AlreadyDeclared { model: String },

    /// Table or column name is not a plain SQL identifier
    #[error("Invalid identifier: {identifier}")]
    InvalidIdentifier { identifier: String },

    // ===== Record Access Errors =====
    /// The record vanished from the data store before a lazy read
    #[error("Record not found: {model} with primary key {primary_key}")]
    RecordNotFound { model: String, primary_key: String },

    /// A non-lazy column that was never loaded
    #[error("Attribute {column} is not loaded on {model}")]
    MissingAttribute { model: String, column: String },

    /// The record carries no primary key value, so it cannot be re-fetched
    #[error("Primary key {column} is not loaded on {model}")]
    MissingPrimaryKey { model: String, column: String },

    /// Accessor of one model used on a record of another
    #[error("Record of model {actual} used with accessor of model {expected}")]
    ModelMismatch { expected: String, actual: String },

    // ===== Integration Errors =====
    /// Lazy columns configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Data store failure surfaced as-is
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl From<LazyColumnsError> for ExError {
    fn from(err: LazyColumnsError) -> Self {
        let message = err.to_string();
        let ex_err = match err {
            LazyColumnsError::NotInstalled => {
                ExError::new(ExErrorKind::NotInstalled).with_op(OP_LAZY_LOAD)
            }
            LazyColumnsError::EmptyLazySet { model } => ExError::new(ExErrorKind::EmptyLazySet)
                .with_op(OP_LAZY_LOAD)
                .with_model(model),
            LazyColumnsError::PrimaryKeyDeclaredLazy { model, column } => {
                ExError::new(ExErrorKind::PrimaryKeyDeclaredLazy)
                    .with_op(OP_LAZY_LOAD)
                    .with_model(model)
                    .with_column(column)
            }
            LazyColumnsError::UnknownColumn { model, column } => {
                ExError::new(ExErrorKind::UnknownColumn)
                    .with_op(OP_LAZY_LOAD)
                    .with_model(model)
                    .with_column(column)
            }
            LazyColumnsError::AlreadyDeclared { model } => {
                ExError::new(ExErrorKind::AlreadyDeclared)
                    .with_op(OP_LAZY_LOAD)
                    .with_model(model)
            }
            LazyColumnsError::InvalidIdentifier { .. } => {
                ExError::new(ExErrorKind::InvalidIdentifier)
            }
            LazyColumnsError::RecordNotFound { model, primary_key } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_op(OP_LAZY_FETCH)
                    .with_model(model)
                    .with_primary_key(primary_key)
            }
            LazyColumnsError::MissingAttribute { model, column } => {
                ExError::new(ExErrorKind::MissingAttribute)
                    .with_op(OP_READ_ATTRIBUTE)
                    .with_model(model)
                    .with_column(column)
            }
            LazyColumnsError::MissingPrimaryKey { model, column } => {
                ExError::new(ExErrorKind::MissingPrimaryKey)
                    .with_op(OP_LAZY_FETCH)
                    .with_model(model)
                    .with_column(column)
            }
            LazyColumnsError::ModelMismatch { expected, .. } => {
                ExError::new(ExErrorKind::ModelMismatch).with_model(expected)
            }
            LazyColumnsError::Config { .. } => ExError::new(ExErrorKind::Config),
            LazyColumnsError::Persistence { .. } => ExError::new(ExErrorKind::Persistence),
        };
        ex_err.with_message(message)
    }
}

impl From<toml::de::Error> for LazyColumnsError {
    fn from(err: toml::de::Error) -> Self {
        LazyColumnsError::Config {
            message: err.to_string(),
        }
    }
}
