//! Process-wide lazy column registry
//!
//! The registry maps model names to their [`LazyColumns`] declaration. It is
//! activated once with [`LazyRegistry::install`]; a second install means the
//! host already provides a `lazy_load` entry point, and the whole mechanism
//! disables itself for the rest of the process instead of fighting it.
//!
//! [`global`] is never torn down: declarations live as long as the process.

use crate::accessor::{LazyColumnSet, LazyColumns};
use crate::backend::ModelBackend;
use crate::config::LazyConfig;
use crate::errors::{LazyColumnsError, Result};
use crate::model::ModelSchema;
use crate::scope::{narrow, Projection};
use crate::{log_op_end, log_op_error, log_op_start};
use lazycols_core_types::schema::{OP_INSTALL, OP_LAZY_LOAD};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::Instant;

/// Diagnostic emitted when the registry is installed twice
pub const INCOMPATIBILITY_DIAGNOSTIC: &str = "Method `lazy_load` already defined on the host model base. \
     This is incompatible with lazy columns and the mechanism will be disabled.";

/// Result of [`LazyRegistry::install`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Disabled,
}

/// Result of a declaration
#[derive(Debug, Clone)]
pub enum Declaration {
    Declared(Arc<LazyColumns>),
    /// The model's table does not exist (yet); nothing was registered
    TableMissing,
    /// The registry is disabled; nothing was registered
    Disabled,
}

impl Declaration {
    pub fn is_declared(&self) -> bool {
        matches!(self, Declaration::Declared(_))
    }

    pub fn columns(&self) -> Option<&Arc<LazyColumns>> {
        match self {
            Declaration::Declared(columns) => Some(columns),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninstalled,
    Active,
    Disabled,
}

#[derive(Debug)]
struct Inner {
    state: State,
    models: HashMap<String, Arc<LazyColumns>>,
}

/// Registry of lazy column declarations, keyed by model name
#[derive(Debug)]
pub struct LazyRegistry {
    inner: RwLock<Inner>,
}

impl Default for LazyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LazyRegistry {
    /// A fresh, uninstalled registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: State::Uninstalled,
                models: HashMap::new(),
            }),
        }
    }

    /// Activate the `lazy_load` entry point
    ///
    /// The first call activates the registry. Any later call is treated as
    /// a naming collision: the registry is disabled for good, a diagnostic
    /// is logged and no error is raised.
    pub fn install(&self) -> Activation {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match inner.state {
            State::Uninstalled => {
                inner.state = State::Active;
                tracing::debug!(op = OP_INSTALL, "lazy columns registry installed");
                Activation::Active
            }
            State::Active | State::Disabled => {
                if inner.state == State::Active {
                    tracing::error!(op = OP_INSTALL, "{}", INCOMPATIBILITY_DIAGNOSTIC);
                }
                inner.state = State::Disabled;
                Activation::Disabled
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == State::Active
    }

    pub fn is_disabled(&self) -> bool {
        self.state() == State::Disabled
    }

    fn state(&self) -> State {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    /// Declare `columns` of `schema` as lazy
    ///
    /// Narrows the model's default projection to the remaining columns and
    /// installs one accessor per lazy column. A disabled registry or a
    /// missing table makes this a silent no-op.
    ///
    /// # Errors
    ///
    /// - `NotInstalled` if [`install`](Self::install) was never called
    /// - `EmptyLazySet`, `PrimaryKeyDeclaredLazy`, `UnknownColumn` for an
    ///   invalid column list
    /// - `AlreadyDeclared` if the model already has lazy columns
    /// - backend errors from table introspection, unchanged
    pub fn lazy_load<B, I, S>(
        &self,
        backend: &B,
        schema: &ModelSchema,
        columns: I,
    ) -> Result<Declaration>
    where
        B: ModelBackend + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.state() {
            State::Uninstalled => return Err(LazyColumnsError::NotInstalled),
            State::Disabled => return Ok(Declaration::Disabled),
            State::Active => {}
        }

        let start = Instant::now();
        log_op_start!(OP_LAZY_LOAD, model = schema.name(), table = schema.table());

        match self.declare(backend, schema, columns) {
            Ok(declaration) => {
                log_op_end!(
                    OP_LAZY_LOAD,
                    duration_ms = start.elapsed().as_millis() as u64,
                    model = schema.name(),
                    declared = declaration.is_declared(),
                    lazy_len = declaration.columns().map_or(0, |c| c.lazy_columns().len())
                );
                Ok(declaration)
            }
            Err(err) => {
                log_op_error!(
                    OP_LAZY_LOAD,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    model = schema.name()
                );
                Err(err)
            }
        }
    }

    fn declare<B, I, S>(&self, backend: &B, schema: &ModelSchema, columns: I) -> Result<Declaration>
    where
        B: ModelBackend + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !backend.table_exists(schema.table())? {
            tracing::debug!(
                op = OP_LAZY_LOAD,
                model = schema.name(),
                table = schema.table(),
                "table missing, lazy columns skipped"
            );
            return Ok(Declaration::TableMissing);
        }

        let lazy = LazyColumnSet::new(
            columns
                .into_iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        );
        let all_columns = backend.column_names(schema.table())?;
        validate(schema, &lazy, &all_columns)?;

        let projection = narrow(schema.table(), &all_columns, &lazy);
        let declared = Arc::new(LazyColumns::new(schema.clone(), lazy, projection));

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.state == State::Disabled {
            return Ok(Declaration::Disabled);
        }
        if inner.models.contains_key(schema.name()) {
            return Err(LazyColumnsError::AlreadyDeclared {
                model: schema.name().to_string(),
            });
        }
        inner
            .models
            .insert(schema.name().to_string(), Arc::clone(&declared));

        Ok(Declaration::Declared(declared))
    }

    /// Apply every model of `config` in one pass
    ///
    /// Stops at the first failing model; earlier models stay declared.
    ///
    /// # Errors
    ///
    /// Same as [`lazy_load`](Self::lazy_load).
    pub fn declare_from_config<B>(
        &self,
        backend: &B,
        config: &LazyConfig,
    ) -> Result<Vec<(String, Declaration)>>
    where
        B: ModelBackend + ?Sized,
    {
        config
            .models
            .iter()
            .map(|model| {
                let declaration = self.lazy_load(backend, &model.schema(), &model.lazy)?;
                Ok((model.name.clone(), declaration))
            })
            .collect()
    }

    /// Declaration for `model`, if any
    pub fn lookup(&self, model: &str) -> Option<Arc<LazyColumns>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .models
            .get(model)
            .cloned()
    }

    /// Default projection of `schema`: narrowed when declared, else all columns
    pub fn default_projection(&self, schema: &ModelSchema) -> Projection {
        self.lookup(schema.name())
            .map(|columns| columns.default_projection().clone())
            .unwrap_or(Projection::All)
    }

    /// Names of all declared models, sorted
    pub fn declared_models(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .models
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

fn validate(schema: &ModelSchema, lazy: &LazyColumnSet, all_columns: &[String]) -> Result<()> {
    if lazy.is_empty() {
        return Err(LazyColumnsError::EmptyLazySet {
            model: schema.name().to_string(),
        });
    }

    if !all_columns.iter().any(|c| c == schema.primary_key()) {
        return Err(LazyColumnsError::UnknownColumn {
            model: schema.name().to_string(),
            column: schema.primary_key().to_string(),
        });
    }

    for column in lazy.iter() {
        if column == schema.primary_key() {
            return Err(LazyColumnsError::PrimaryKeyDeclaredLazy {
                model: schema.name().to_string(),
                column: column.to_string(),
            });
        }
        if !all_columns.iter().any(|c| c == column) {
            return Err(LazyColumnsError::UnknownColumn {
                model: schema.name().to_string(),
                column: column.to_string(),
            });
        }
    }

    Ok(())
}

static GLOBAL: OnceLock<LazyRegistry> = OnceLock::new();

/// The process-wide registry
///
/// Starts uninstalled; call `global().install()` once during startup.
pub fn global() -> &'static LazyRegistry {
    GLOBAL.get_or_init(LazyRegistry::new)
}
