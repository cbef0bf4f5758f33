use indexmap::IndexMap;

use crate::{
    Ident,
    expr::{Expr, IntoExpr},
    ident::IntoIdent,
};

/// Ordered column to value mapping, one row of an insert or the assignments
/// of an update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    values: IndexMap<Ident, Expr>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, a repeated column keeps its first position.
    pub fn field<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoExpr,
    {
        self.values.insert(column.into_ident(), value.into_expr());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Ident> {
        self.values.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Expr> {
        self.values.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Expr)> {
        self.values.iter()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.keys().any(|ident| ident.as_str() == column)
    }
}

pub trait IntoRow {
    fn into_row(self) -> Row;
}

impl IntoRow for Row {
    fn into_row(self) -> Row {
        self
    }
}

impl<F> IntoRow for F
where
    F: FnOnce(&mut Row),
{
    fn into_row(self) -> Row {
        let mut row = Row::new();
        self(&mut row);
        row
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: IntoIdent,
    V: IntoExpr,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.field(column, value);
        }
        row
    }
}
