use crate::{
    Statement,
    bind::Params,
    ddl::{CommentTarget, Ddl},
    error::Result,
    expr::order::Order,
    ident::IntoIdent,
    insert::InsertSource,
    paginate,
    upsert::UpdateColumns,
};

/// Statement synthesis for one SQL dialect.
///
/// Methods that need nothing but their arguments come with a default body,
/// the ones consulting configuration or the catalog are left to the
/// implementor.
pub trait DialectBuilder {
    /// Strip qualifiers from dotted order keys.
    fn normalize_order(&self, order: &Order) -> Order {
        order.normalize()
    }

    fn rewrite_pagination(
        &self,
        fragment: &str,
        order: &Order,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> String {
        paginate::rewrite_pagination(fragment, order, limit, offset)
    }

    fn build_order_by_and_limit(
        &self,
        sql: &str,
        order: &Order,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> String {
        paginate::build_order_by_and_limit(sql, order, limit, offset)
    }

    fn insert<T: IntoIdent>(&self, table: T, source: InsertSource, params: Params)
    -> Result<Statement>;

    /// Insert, or update the existing row matching a unique constraint.
    fn upsert<T, U>(
        &self,
        table: T,
        source: InsertSource,
        update: U,
        params: Params,
    ) -> Result<Statement>
    where
        T: IntoIdent,
        U: Into<UpdateColumns>;

    fn truncate_table<T: IntoIdent>(&self, table: T) -> String {
        Ddl::Truncate(&table.into_ident()).to_sql()
    }

    fn alter_column<T, C>(&self, table: T, column: C, ty: &str) -> String
    where
        T: IntoIdent,
        C: IntoIdent;

    fn drop_comment(&self, target: &CommentTarget) -> String {
        Ddl::Comment {
            target,
            comment: "",
        }
        .to_sql()
    }

    fn add_comment(&self, target: &CommentTarget, comment: &str) -> String {
        Ddl::Comment { target, comment }.to_sql()
    }

    /// Restart the identity of `table` at `value`, or one past its current
    /// maximum when no value is given.
    fn reset_sequence(&self, table: &str, value: Option<i64>) -> Result<String>;

    /// Switch integrity checking for one table, or for every table of a
    /// schema. Returns an empty string when there is nothing to switch.
    fn check_integrity(
        &self,
        check: bool,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<String>;

    fn select_exists(&self, sql: &str) -> String {
        Ddl::SelectExists(sql).to_sql()
    }
}
