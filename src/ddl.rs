//! One statement helpers: truncation, column type changes, comments,
//! identity restarts and integrity checking.

use crate::{
    Ident,
    bind::Params,
    catalog::Catalog,
    error::{Error, Result},
    writer::{FormatContext, FormatWriter, render},
};

/// Object a comment is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Table(Ident),
    Column(Ident, Ident),
}

impl CommentTarget {
    pub fn table<T: crate::ident::IntoIdent>(table: T) -> Self {
        Self::Table(table.into_ident())
    }

    pub fn column<T, C>(table: T, column: C) -> Self
    where
        T: crate::ident::IntoIdent,
        C: crate::ident::IntoIdent,
    {
        Self::Column(table.into_ident(), column.into_ident())
    }
}

pub(crate) enum Ddl<'a> {
    Truncate(&'a Ident),
    AlterColumnType {
        table: &'a Ident,
        column: &'a Ident,
        ty: &'a str,
    },
    /// DB2 has no `DROP COMMENT`, dropping writes an empty comment.
    Comment {
        target: &'a CommentTarget,
        comment: &'a str,
    },
    MaxValue {
        table: &'a Ident,
        column: &'a Ident,
    },
    RestartIdentity {
        table: &'a Ident,
        column: &'a Ident,
        value: i64,
    },
    SetIntegrity {
        tables: &'a [Ident],
        check: bool,
    },
    SelectExists(&'a str),
}

impl FormatWriter for Ddl<'_> {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Ddl::Truncate(table) => {
                context.writer.write_str("TRUNCATE TABLE ")?;
                table.format_writer(context)?;
                context.writer.write_str(" IMMEDIATE")
            }
            Ddl::AlterColumnType { table, column, ty } => {
                context.writer.write_str("ALTER TABLE ")?;
                table.format_writer(context)?;
                context.writer.write_str(" ALTER COLUMN ")?;
                column.format_writer(context)?;
                context.writer.write_str(" SET DATA TYPE ")?;
                context.writer.write_str(ty)
            }
            Ddl::Comment { target, comment } => {
                match target {
                    CommentTarget::Table(table) => {
                        context.writer.write_str("COMMENT ON TABLE ")?;
                        table.format_writer(context)?;
                    }
                    CommentTarget::Column(table, column) => {
                        context.writer.write_str("COMMENT ON COLUMN ")?;
                        table.format_writer(context)?;
                        context.writer.write_char('.')?;
                        column.format_writer(context)?;
                    }
                }
                context.writer.write_str(" IS ")?;
                context.write_literal(comment)
            }
            Ddl::MaxValue { table, column } => {
                context.writer.write_str("SELECT MAX(")?;
                column.format_writer(context)?;
                context.writer.write_str(") FROM ")?;
                table.format_writer(context)
            }
            Ddl::RestartIdentity {
                table,
                column,
                value,
            } => {
                context.writer.write_str("ALTER TABLE ")?;
                table.format_writer(context)?;
                context.writer.write_str(" ALTER COLUMN ")?;
                column.format_writer(context)?;
                write!(context.writer, " RESTART WITH {value}")
            }
            Ddl::SetIntegrity { tables, check } => {
                context.writer.write_str("SET INTEGRITY FOR ")?;
                for (index, table) in tables.iter().enumerate() {
                    if index > 0 {
                        context.writer.write_str(", ")?;
                    }
                    table.format_writer(context)?;
                    if !check {
                        context.writer.write_str(" ALL")?;
                    }
                }
                if *check {
                    context.writer.write_str(" IMMEDIATE CHECKED;")
                } else {
                    context.writer.write_str(" IMMEDIATE UNCHECKED;")
                }
            }
            Ddl::SelectExists(sql) => {
                context.writer.write_str("SELECT CASE WHEN COUNT(*)>0 THEN 1 ELSE 0 END FROM (")?;
                context.writer.write_str(sql)?;
                context.writer.write_str(") CHECKEXISTS")
            }
        }
    }
}

impl Ddl<'_> {
    pub(crate) fn to_sql(&self) -> String {
        render(self, Params::new()).0
    }
}

/// Catalog query listing regular tables, filtered on pending checks when
/// integrity is being switched back on.
const USER_TABLES: &str =
    "SELECT t.tabname FROM syscat.tables AS t WHERE t.type in ('T') AND t.ownertype != 'S'";

pub(crate) fn reset_sequence<C: Catalog>(
    catalog: &C,
    table: &str,
    value: Option<i64>,
) -> Result<String> {
    tracing::trace!(table, "resolving identity column");
    let schema = catalog
        .table_schema(table)?
        .ok_or_else(|| Error::not_found(table))?;
    let column = schema.sequence_column().cloned().ok_or_else(|| {
        Error::invalid_argument(format!(
            "There is no sequence associated with table '{table}'."
        ))
    })?;

    let table = Ident::new(table);
    let column = Ident::new(column);
    let value = match value {
        Some(value) => value,
        None => {
            let sql = Ddl::MaxValue {
                table: &table,
                column: &column,
            }
            .to_sql();
            let max = match catalog.query_scalar(&sql, &Params::new())? {
                None => 0,
                Some(max) if max.is_null() => 0,
                Some(max) => max.as_i64().ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "Maximum of {column} in table '{table}' is not an integer: {max:?}"
                    ))
                })?,
            };
            max.saturating_add(1)
        }
    };

    let sql = Ddl::RestartIdentity {
        table: &table,
        column: &column,
        value,
    }
    .to_sql();
    tracing::debug!(%table, %column, value, "restarting identity");
    Ok(sql)
}

pub(crate) fn check_integrity<C: Catalog>(
    catalog: &C,
    check: bool,
    schema: Option<&str>,
    table: Option<&str>,
) -> Result<String> {
    let tables: Vec<Ident> = match table.filter(|t| !t.is_empty()) {
        Some(table) => vec![Ident::new(table)],
        None => {
            let schema = schema
                .filter(|s| !s.is_empty())
                .or_else(|| catalog.default_schema())
                .filter(|s| !s.is_empty());
            let mut sql = String::from(USER_TABLES);
            if check {
                sql.push_str(" AND t.status = 'C'");
            }
            let mut params = Params::new();
            if let Some(schema) = schema {
                sql.push_str(" AND t.tabschema = :schema");
                params.bind("schema", schema.to_owned());
            }
            tracing::trace!(sql = %sql, "listing tables for integrity toggle");
            catalog
                .query_column(&sql, &params)?
                .into_iter()
                .map(Ident::new)
                .collect()
        }
    };

    if tables.is_empty() {
        tracing::debug!(check, "no tables to toggle integrity on");
        return Ok(String::new());
    }

    let sql = Ddl::SetIntegrity {
        tables: &tables,
        check,
    }
    .to_sql();
    tracing::debug!(check, tables = tables.len(), "toggling integrity");
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{bind::Bind, catalog::TableSchema, tests::MemoryCatalog};

    use super::*;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::default()
            .table(TableSchema::new("item").column("id").column("name").sequence("id"))
            .table(TableSchema::new("note").column("body"))
    }

    #[test]
    fn test_truncate() {
        let table = Ident::new_static("s.item");
        assert_eq!(
            r#"TRUNCATE TABLE "s"."item" IMMEDIATE"#,
            Ddl::Truncate(&table).to_sql()
        );
    }

    #[test]
    fn test_comments() {
        let target = CommentTarget::column("item", "name");
        assert_eq!(
            r#"COMMENT ON COLUMN "item"."name" IS ''"#,
            Ddl::Comment {
                target: &target,
                comment: ""
            }
            .to_sql()
        );
        let target = CommentTarget::table("item");
        assert_eq!(
            r#"COMMENT ON TABLE "item" IS 'it''s'"#,
            Ddl::Comment {
                target: &target,
                comment: "it's"
            }
            .to_sql()
        );
    }

    #[test]
    fn test_reset_sequence_with_value() {
        let catalog = catalog();
        assert_eq!(
            r#"ALTER TABLE "item" ALTER COLUMN "id" RESTART WITH 5"#,
            reset_sequence(&catalog, "item", Some(5)).unwrap()
        );
        assert!(catalog.queries().is_empty());
    }

    #[test]
    fn test_reset_sequence_from_max() {
        let catalog = catalog().scalar(Some(Bind::I32(41)));
        assert_eq!(
            r#"ALTER TABLE "item" ALTER COLUMN "id" RESTART WITH 42"#,
            reset_sequence(&catalog, "item", None).unwrap()
        );
        assert_eq!(vec![r#"SELECT MAX("id") FROM "item""#.to_owned()], catalog.queries());
    }

    #[test]
    fn test_reset_sequence_empty_table() {
        let catalog = catalog().scalar(Some(Bind::Null));
        assert_eq!(
            r#"ALTER TABLE "item" ALTER COLUMN "id" RESTART WITH 1"#,
            reset_sequence(&catalog, "item", None).unwrap()
        );
    }

    #[test]
    fn test_reset_sequence_unreadable_max() {
        for max in [Bind::U64(u64::MAX), Bind::Bool(true), Bind::StaticString("n/a")] {
            let catalog = catalog().scalar(Some(max));
            let err = reset_sequence(&catalog, "item", None).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
            assert!(err.to_string().contains("table 'item'"));
        }
    }

    #[test]
    fn test_reset_sequence_without_rows() {
        let catalog = catalog().scalar(None);
        assert_eq!(
            r#"ALTER TABLE "item" ALTER COLUMN "id" RESTART WITH 1"#,
            reset_sequence(&catalog, "item", None).unwrap()
        );
    }

    #[test]
    fn test_reset_sequence_errors() {
        let catalog = catalog();
        let err = reset_sequence(&catalog, "missing", None).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref table) if table == "missing"));
        let err = reset_sequence(&catalog, "note", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(
            "Invalid argument: There is no sequence associated with table 'note'.",
            err.to_string()
        );
    }

    #[test]
    fn test_check_integrity_explicit_table() {
        let catalog = catalog();
        assert_eq!(
            r#"SET INTEGRITY FOR "item" IMMEDIATE CHECKED;"#,
            check_integrity(&catalog, true, None, Some("item")).unwrap()
        );
        assert_eq!(
            r#"SET INTEGRITY FOR "item" ALL IMMEDIATE UNCHECKED;"#,
            check_integrity(&catalog, false, Some("ignored"), Some("item")).unwrap()
        );
        assert!(catalog.queries().is_empty());
    }

    #[test]
    fn test_check_integrity_from_catalog() {
        let catalog = catalog().column(["A", "B"]).default_schema_name("DB2INST1");
        assert_eq!(
            r#"SET INTEGRITY FOR "A" ALL, "B" ALL IMMEDIATE UNCHECKED;"#,
            check_integrity(&catalog, false, None, None).unwrap()
        );
        assert_eq!(
            vec![format!("{USER_TABLES} AND t.tabschema = :schema")],
            catalog.queries()
        );
        let params = catalog.last_params();
        assert_eq!(Some(&Bind::String("DB2INST1".into())), params.get(":schema"));
    }

    #[test]
    fn test_check_integrity_pending_filter() {
        let catalog = catalog().column(["A"]);
        assert_eq!(
            r#"SET INTEGRITY FOR "A" IMMEDIATE CHECKED;"#,
            check_integrity(&catalog, true, Some("APP"), None).unwrap()
        );
        assert_eq!(
            vec![format!("{USER_TABLES} AND t.status = 'C' AND t.tabschema = :schema")],
            catalog.queries()
        );
    }

    #[test]
    fn test_check_integrity_without_tables() {
        let catalog = catalog();
        assert_eq!("", check_integrity(&catalog, true, None, None).unwrap());
        assert_eq!(vec![format!("{USER_TABLES} AND t.status = 'C'")], catalog.queries());
        assert!(catalog.last_params().is_empty());
    }

    #[test]
    fn test_select_exists() {
        assert_eq!(
            r#"SELECT CASE WHEN COUNT(*)>0 THEN 1 ELSE 0 END FROM (SELECT 1 FROM "t") CHECKEXISTS"#,
            Ddl::SelectExists("SELECT 1 FROM \"t\"").to_sql()
        );
    }
}
