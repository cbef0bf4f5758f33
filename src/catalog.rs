//! Metadata collaborator consulted while building statements.

use smol_str::SmolStr;

use crate::{
    bind::{Bind, Params},
    error::Result,
};

/// Schema of one table as far as statement synthesis needs it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: SmolStr,
    /// The identity column, if the table has one.
    pub sequence_name: Option<SmolStr>,
    pub columns: Vec<SmolStr>,
}

impl TableSchema {
    pub fn new<N: Into<SmolStr>>(name: N) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn column<C: Into<SmolStr>>(mut self, column: C) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn sequence<C: Into<SmolStr>>(mut self, column: C) -> Self {
        self.sequence_name = Some(column.into());
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// The identity column, only when it is one of the table's columns.
    pub fn sequence_column(&self) -> Option<&SmolStr> {
        self.sequence_name
            .as_ref()
            .filter(|name| self.has_column(name))
    }
}

/// A set of columns that together are unique for a table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: Option<SmolStr>,
    pub column_names: Vec<SmolStr>,
}

impl Constraint {
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SmolStr>,
    {
        Self {
            name: None,
            column_names: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named<N: Into<SmolStr>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sorted column set, equal for constraints over the same columns.
    pub(crate) fn key(&self) -> Vec<&str> {
        let mut key: Vec<&str> = self.column_names.iter().map(SmolStr::as_str).collect();
        key.sort_unstable();
        key.dedup();
        key
    }
}

/// Catalog and connection lookups. Calls are issued one at a time and their
/// results are never cached here.
pub trait Catalog {
    /// `None` when the table does not exist.
    fn table_schema(&self, table: &str) -> Result<Option<TableSchema>>;

    /// Primary key, unique indexes and unique constraints of the table.
    fn unique_constraints(&self, table: &str) -> Result<Vec<Constraint>>;

    /// First column of the first row, `None` for an empty result.
    fn query_scalar(&self, sql: &str, params: &Params) -> Result<Option<Bind>>;

    /// First column of every row.
    fn query_column(&self, sql: &str, params: &Params) -> Result<Vec<SmolStr>>;

    /// Schema used when a lookup names none.
    fn default_schema(&self) -> Option<&str> {
        None
    }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn table_schema(&self, table: &str) -> Result<Option<TableSchema>> {
        (**self).table_schema(table)
    }

    fn unique_constraints(&self, table: &str) -> Result<Vec<Constraint>> {
        (**self).unique_constraints(table)
    }

    fn query_scalar(&self, sql: &str, params: &Params) -> Result<Option<Bind>> {
        (**self).query_scalar(sql, params)
    }

    fn query_column(&self, sql: &str, params: &Params) -> Result<Vec<SmolStr>> {
        (**self).query_column(sql, params)
    }

    fn default_schema(&self) -> Option<&str> {
        (**self).default_schema()
    }
}
