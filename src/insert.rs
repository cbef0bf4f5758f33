use crate::{
    Ident, Raw, Statement,
    bind::{Binds, IntoBinds, Params},
    ident::IntoIdent,
    raw::IntoRaw,
    row::{IntoRow, Row},
    writer::{FormatContext, FormatWriter, render},
};

/// Rows fed to an insert or upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// A single row of column values.
    Row(Row),
    /// A subquery producing rows for the listed columns.
    Select {
        columns: Vec<Ident>,
        query: Raw,
        binds: Binds,
    },
}

impl InsertSource {
    pub fn row<R: IntoRow>(row: R) -> Self {
        Self::Row(row.into_row())
    }

    pub fn select<C, I, R, B>(columns: C, query: R, binds: B) -> Self
    where
        C: IntoIterator<Item = I>,
        I: IntoIdent,
        R: IntoRaw,
        B: IntoBinds,
    {
        Self::Select {
            columns: columns.into_iter().map(IntoIdent::into_ident).collect(),
            query: query.into_raw(),
            binds: binds.into_binds(),
        }
    }

    /// Inserted column names in order.
    pub fn columns(&self) -> Vec<&Ident> {
        match self {
            InsertSource::Row(row) => row.columns().collect(),
            InsertSource::Select { columns, .. } => columns.iter().collect(),
        }
    }
}

impl From<Row> for InsertSource {
    fn from(row: Row) -> Self {
        Self::Row(row)
    }
}

/// Plain `INSERT INTO`.
///
/// DB2 has no `DEFAULT VALUES`, an empty row is written as one `DEFAULT` per
/// table column. Only when the column count is unknown does it fall back to
/// `DEFAULT VALUES`.
pub(crate) struct InsertStatement<'a> {
    pub(crate) table: &'a Ident,
    pub(crate) source: &'a InsertSource,
    pub(crate) default_columns: usize,
}

impl FormatWriter for InsertStatement<'_> {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.writer.write_str("INSERT INTO ")?;
        self.table.format_writer(context)?;

        match self.source {
            InsertSource::Row(row) if row.is_empty() => {
                if self.default_columns == 0 {
                    return context.writer.write_str(" DEFAULT VALUES");
                }
                context.writer.write_str(" VALUES (")?;
                for index in 0..self.default_columns {
                    if index > 0 {
                        context.writer.write_str(", ")?;
                    }
                    context.writer.write_str("DEFAULT")?;
                }
                context.writer.write_char(')')
            }
            InsertSource::Row(row) => {
                context.writer.write_str(" (")?;
                context.write_list(row.columns())?;
                context.writer.write_str(") VALUES (")?;
                context.write_list(row.values())?;
                context.writer.write_char(')')
            }
            InsertSource::Select {
                columns,
                query,
                binds,
            } => {
                if !columns.is_empty() {
                    context.writer.write_str(" (")?;
                    context.write_list(columns)?;
                    context.writer.write_char(')')?;
                }
                context.writer.write_char(' ')?;
                query.format_with_binds(context, binds)
            }
        }
    }
}

pub(crate) fn build_insert(
    table: &Ident,
    source: &InsertSource,
    default_columns: usize,
    params: Params,
) -> Statement {
    let insert = InsertStatement {
        table,
        source,
        default_columns,
    };
    let (sql, params) = render(&insert, params);
    tracing::debug!(%table, sql = %sql, "built insert");
    Statement { sql, params }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{bind::Bind, expr::Expr};

    use super::*;

    #[test]
    fn test_insert_row() {
        let source = InsertSource::row(|row: &mut Row| {
            row.field("name", "ovior")
                .field("created_at", Expr::raw("CURRENT TIMESTAMP", ()));
        });
        let stmt = build_insert(&Ident::new_static("users"), &source, 0, Params::new());
        assert_eq!(
            r#"INSERT INTO "users" ("name", "created_at") VALUES (:qp0, CURRENT TIMESTAMP)"#,
            stmt.sql
        );
        assert_eq!(vec![Bind::StaticString("ovior")], stmt.params.into_values());
    }

    #[test]
    fn test_insert_continues_params() {
        let mut params = Params::new();
        params.push(Bind::I32(1));
        let source = InsertSource::row(|row: &mut Row| {
            row.field("id", 2i32);
        });
        let stmt = build_insert(&Ident::new_static("s.t"), &source, 0, params);
        assert_eq!(r#"INSERT INTO "s"."t" ("id") VALUES (:qp1)"#, stmt.sql);
        assert_eq!(2, stmt.params.len());
    }

    #[test]
    fn test_insert_empty_row() {
        let source = InsertSource::Row(Row::new());
        let table = Ident::new_static("t");
        assert_eq!(
            r#"INSERT INTO "t" VALUES (DEFAULT, DEFAULT, DEFAULT)"#,
            build_insert(&table, &source, 3, Params::new()).sql
        );
        assert_eq!(
            r#"INSERT INTO "t" DEFAULT VALUES"#,
            build_insert(&table, &source, 0, Params::new()).sql
        );
    }

    #[test]
    fn test_insert_select() {
        let source = InsertSource::select(
            ["model_type", "model_id"],
            "SELECT 'topic', ? FROM \"jobs\" WHERE \"status\" = ?",
            [Bind::I32(1), Bind::StaticString("queued")],
        );
        let stmt = build_insert(&Ident::new_static("jobs"), &source, 0, Params::new());
        assert_eq!(
            r#"INSERT INTO "jobs" ("model_type", "model_id") SELECT 'topic', :qp0 FROM "jobs" WHERE "status" = :qp1"#,
            stmt.sql
        );
        assert_eq!(2, stmt.params.len());
    }
}
