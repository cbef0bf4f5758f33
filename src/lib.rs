//! DB2 statement synthesis: paging through row numbering, `MERGE` based
//! upserts and the handful of DDL statements DB2 spells its own way.

mod bind;
mod builder;
mod catalog;
mod ddl;
mod dialect;
mod error;
mod expr;
mod ident;
mod insert;
mod paginate;
mod raw;
mod row;
mod template;
mod types;
mod upsert;
mod writer;

pub use bind::{Bind, Binds, IntoBind, IntoBinds, Params};
pub use builder::{Db2Builder, Db2Config};
pub use catalog::{Catalog, Constraint, TableSchema};
pub use ddl::CommentTarget;
pub use dialect::DialectBuilder;
pub use error::{Error, Result};
pub use expr::{
    Expr, IntoExpr,
    order::{Order, OrderExpr, Ordering},
};
pub use ident::{Ident, IntoIdent};
pub use insert::InsertSource;
pub use paginate::{ROW_NUMBER_COLUMN, Strategy, build_order_by_and_limit, rewrite_pagination};
pub use raw::{IntoRaw, Raw};
pub use row::{IntoRow, Row};
pub use template::{Slot, SlotValues, Template};
pub use types::TypeMap;
pub use upsert::UpdateColumns;

/// SQL text with the values bound to its placeholders.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

/// Replace qualified order keys by their last segment.
pub fn normalize_order(order: &Order) -> Order {
    order.normalize()
}

pub fn ident_static(value: &'static str) -> Ident {
    Ident::new_static(value)
}

pub fn ident(value: &str) -> Ident {
    Ident::new(value)
}

pub fn raw_static(value: &'static str) -> Raw {
    Raw::new_static(value)
}

pub fn raw(value: &str) -> Raw {
    Raw::new(value)
}

/// Bare column reference, for assignments reading the incoming row.
pub fn col(value: &str) -> Expr {
    Expr::column(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use smol_str::SmolStr;

    use crate::{
        Bind, Constraint, Error, Params, Result, TableSchema,
        catalog::Catalog,
        writer::{self, FormatWriter},
    };

    pub(crate) fn format_writer<W: FormatWriter>(writer: W) -> String {
        writer::render(&writer, Params::new()).0
    }

    /// Catalog answering from memory and recording the SQL it is asked to run.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryCatalog {
        tables: Vec<TableSchema>,
        constraints: Vec<(SmolStr, Constraint)>,
        scalar: Option<Bind>,
        column: Vec<SmolStr>,
        default_schema: Option<SmolStr>,
        failing: bool,
        queries: RefCell<Vec<String>>,
        last_params: RefCell<Params>,
    }

    impl MemoryCatalog {
        pub(crate) fn table(mut self, table: TableSchema) -> Self {
            self.tables.push(table);
            self
        }

        pub(crate) fn constraint(mut self, table: &str, constraint: Constraint) -> Self {
            self.constraints.push((table.into(), constraint));
            self
        }

        pub(crate) fn scalar(mut self, value: Option<Bind>) -> Self {
            self.scalar = value;
            self
        }

        pub(crate) fn column<I, S>(mut self, values: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<SmolStr>,
        {
            self.column = values.into_iter().map(Into::into).collect();
            self
        }

        pub(crate) fn default_schema_name(mut self, schema: &str) -> Self {
            self.default_schema = Some(schema.into());
            self
        }

        /// Every lookup fails as if the connection dropped.
        pub(crate) fn failing(mut self) -> Self {
            self.failing = true;
            self
        }

        pub(crate) fn queries(&self) -> Vec<String> {
            self.queries.borrow().clone()
        }

        pub(crate) fn last_params(&self) -> Params {
            self.last_params.borrow().clone()
        }

        fn check(&self) -> Result<()> {
            if self.failing {
                return Err(Error::catalog("connection lost"));
            }
            Ok(())
        }

        fn record(&self, sql: &str, params: &Params) {
            self.queries.borrow_mut().push(sql.to_owned());
            *self.last_params.borrow_mut() = params.clone();
        }
    }

    impl Catalog for MemoryCatalog {
        fn table_schema(&self, table: &str) -> Result<Option<TableSchema>> {
            self.check()?;
            Ok(self.tables.iter().find(|t| t.name == table).cloned())
        }

        fn unique_constraints(&self, table: &str) -> Result<Vec<Constraint>> {
            self.check()?;
            Ok(self
                .constraints
                .iter()
                .filter(|(name, _)| name == table)
                .map(|(_, constraint)| constraint.clone())
                .collect())
        }

        fn query_scalar(&self, sql: &str, params: &Params) -> Result<Option<Bind>> {
            self.check()?;
            self.record(sql, params);
            Ok(self.scalar.clone())
        }

        fn query_column(&self, sql: &str, params: &Params) -> Result<Vec<SmolStr>> {
            self.check()?;
            self.record(sql, params);
            Ok(self.column.clone())
        }

        fn default_schema(&self) -> Option<&str> {
            self.default_schema.as_deref()
        }
    }
}
