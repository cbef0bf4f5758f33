//! Insert-or-update through `MERGE`, DB2 has no `ON CONFLICT`.
//!
//! The incoming row becomes a one row relation aliased as the source, the
//! target is matched against it on every applicable unique constraint and
//! the `WHEN MATCHED` / `WHEN NOT MATCHED` branches do the rest.

use crate::{
    Ident, Statement,
    bind::Params,
    catalog::Constraint,
    expr::{
        Expr,
        cond::{Conditions, Conjunction},
    },
    insert::InsertSource,
    row::Row,
    writer::{FormatContext, FormatWriter, render},
};

/// What to do with a row that already exists.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum UpdateColumns {
    /// Keep the existing row.
    #[default]
    None,
    /// Overwrite every inserted column with the incoming value.
    All,
    /// Explicit assignments. Bare column references on the right hand side
    /// read from the incoming row.
    Set(Row),
}

impl UpdateColumns {
    pub fn is_insert_only(&self) -> bool {
        match self {
            UpdateColumns::None => true,
            UpdateColumns::All => false,
            UpdateColumns::Set(row) => row.is_empty(),
        }
    }
}

impl From<bool> for UpdateColumns {
    fn from(value: bool) -> Self {
        if value {
            UpdateColumns::All
        } else {
            UpdateColumns::None
        }
    }
}

impl From<Row> for UpdateColumns {
    fn from(row: Row) -> Self {
        UpdateColumns::Set(row)
    }
}

/// Drop constraints with a column the insert does not provide and keep one
/// constraint per distinct column set, in catalog order.
pub(crate) fn applicable_constraints(
    constraints: Vec<Constraint>,
    insert_columns: &[&Ident],
) -> Vec<Constraint> {
    let mut kept: Vec<Constraint> = Vec::with_capacity(constraints.len());
    for constraint in constraints {
        if constraint.column_names.is_empty() {
            continue;
        }
        let covered = constraint
            .column_names
            .iter()
            .all(|name| insert_columns.iter().any(|col| col.as_str() == name.as_str()));
        if !covered {
            continue;
        }
        if kept.iter().any(|other| other.key() == constraint.key()) {
            continue;
        }
        kept.push(constraint);
    }
    kept
}

pub(crate) struct MergeStatement<'a> {
    pub(crate) table: &'a Ident,
    pub(crate) source: &'a InsertSource,
    pub(crate) update: &'a UpdateColumns,
    pub(crate) constraints: &'a [Constraint],
    pub(crate) alias: &'a Ident,
    pub(crate) dummy_table: &'a Ident,
}

impl MergeStatement<'_> {
    /// OR across constraints, AND across the columns of one constraint.
    fn match_condition(&self) -> Conditions {
        let mut any = Conditions::default();
        for constraint in self.constraints {
            let mut all = Conditions::default();
            for name in &constraint.column_names {
                let column = Ident::new(name.clone());
                all.push_column_eq(
                    Conjunction::And,
                    column.qualify(self.table),
                    column.qualify(self.alias),
                );
            }
            any.push_group(Conjunction::Or, all);
        }
        any
    }

    fn from_source(&self, column: &Ident) -> Ident {
        if column.is_qualified() {
            column.clone()
        } else {
            column.qualify(self.alias)
        }
    }

    fn write_source<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self.source {
            InsertSource::Row(row) if row.values().all(Expr::is_value) => {
                context.writer.write_str("VALUES (")?;
                context.write_list(row.values())?;
                context.writer.write_char(')')
            }
            InsertSource::Row(row) => {
                context.writer.write_str("SELECT ")?;
                for (index, (column, value)) in row.iter().enumerate() {
                    if index > 0 {
                        context.writer.write_str(", ")?;
                    }
                    value.format_writer(context)?;
                    context.writer.write_str(" AS ")?;
                    column.format_writer(context)?;
                }
                context.writer.write_str(" FROM ")?;
                self.dummy_table.format_writer(context)
            }
            InsertSource::Select { query, binds, .. } => query.format_with_binds(context, binds),
        }
    }

    fn write_assignments<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self.update {
            UpdateColumns::None => Ok(()),
            UpdateColumns::All => {
                for (index, column) in self.source.columns().into_iter().enumerate() {
                    if index > 0 {
                        context.writer.write_str(", ")?;
                    }
                    column.format_writer(context)?;
                    context.writer.write_str(" = ")?;
                    self.from_source(column).format_writer(context)?;
                }
                Ok(())
            }
            UpdateColumns::Set(row) => {
                for (index, (column, value)) in row.iter().enumerate() {
                    if index > 0 {
                        context.writer.write_str(", ")?;
                    }
                    column.format_writer(context)?;
                    context.writer.write_str(" = ")?;
                    match value {
                        Expr::Column(ident) => self.from_source(ident).format_writer(context)?,
                        other => other.format_writer(context)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl FormatWriter for MergeStatement<'_> {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        let columns = self.source.columns();

        context.writer.write_str("MERGE INTO ")?;
        self.table.format_writer(context)?;
        context.writer.write_str(" USING (")?;
        self.write_source(context)?;
        context.writer.write_str(") AS ")?;
        self.alias.format_writer(context)?;
        context.writer.write_str(" (")?;
        context.write_list(columns.iter().copied())?;
        context.writer.write_str(") ON (")?;
        self.match_condition().format_writer(context)?;
        context.writer.write_char(')')?;

        if !self.update.is_insert_only() {
            context.writer.write_str(" WHEN MATCHED THEN UPDATE SET ")?;
            self.write_assignments(context)?;
        }

        context.writer.write_str(" WHEN NOT MATCHED THEN INSERT (")?;
        context.write_list(columns.iter().copied())?;
        context.writer.write_str(") VALUES (")?;
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                context.writer.write_str(", ")?;
            }
            self.from_source(column).format_writer(context)?;
        }
        context.writer.write_char(')')
    }
}

pub(crate) fn build_merge(merge: &MergeStatement<'_>, params: Params) -> Statement {
    let (sql, params) = render(merge, params);
    tracing::debug!(
        table = %merge.table,
        constraints = merge.constraints.len(),
        sql = %sql,
        "built merge"
    );
    Statement { sql, params }
}
