//! Default scope narrowing
//!
//! A declared model's default projection is the complement of its lazy
//! set, every column qualified by table name.

use crate::accessor::LazyColumnSet;

/// A column reference rendered as `table.column`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedColumn {
    pub table: String,
    pub column: String,
}

impl QualifiedColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Column set requested by a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every column of the table
    All,
    /// Exactly these columns, in this order
    Columns(Vec<QualifiedColumn>),
}

impl Projection {
    /// Explicit projection of `columns` on `table`
    pub fn columns<I, S>(table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Projection::Columns(
            columns
                .into_iter()
                .map(|c| QualifiedColumn::new(table, c.as_ref()))
                .collect(),
        )
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Projection::All)
    }

    /// Unqualified column names, `None` for [`Projection::All`]
    pub fn column_names(&self) -> Option<Vec<&str>> {
        match self {
            Projection::All => None,
            Projection::Columns(cols) => Some(cols.iter().map(|c| c.column.as_str()).collect()),
        }
    }

    /// Whether this projection loads `column`
    pub fn includes(&self, column: &str) -> bool {
        match self {
            Projection::All => true,
            Projection::Columns(cols) => cols.iter().any(|c| c.column == column),
        }
    }
}

/// Narrow the default projection of `table` to `all_columns − lazy`
///
/// Keeps the table's column order.
pub fn narrow(table: &str, all_columns: &[String], lazy: &LazyColumnSet) -> Projection {
    Projection::columns(table, all_columns.iter().filter(|c| !lazy.contains(c)))
}
