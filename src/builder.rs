use crate::{
    Ident, Statement,
    bind::Params,
    catalog::Catalog,
    ddl::{self, Ddl},
    dialect::DialectBuilder,
    error::Result,
    ident::IntoIdent,
    insert::{InsertSource, build_insert},
    types::TypeMap,
    upsert::{MergeStatement, UpdateColumns, applicable_constraints, build_merge},
};

/// DB2 specifics that are fixed for the lifetime of a builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Db2Config {
    pub type_map: TypeMap,
    /// Name of the incoming row relation inside `MERGE`.
    pub source_alias: Ident,
    /// One row table used to project computed values.
    pub dummy_table: Ident,
}

impl Default for Db2Config {
    fn default() -> Self {
        Self {
            type_map: TypeMap::default(),
            source_alias: Ident::new_static("EXCLUDED"),
            dummy_table: Ident::new_static("SYSIBM.SYSDUMMY1"),
        }
    }
}

/// [`DialectBuilder`] for DB2, consulting `catalog` for table metadata.
#[derive(Debug, Clone)]
pub struct Db2Builder<C> {
    catalog: C,
    config: Db2Config,
}

impl<C: Catalog> Db2Builder<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            config: Db2Config::default(),
        }
    }

    pub fn with_config(mut self, config: Db2Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Db2Config {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn default_columns(&self, table: &Ident, source: &InsertSource) -> Result<usize> {
        match source {
            InsertSource::Row(row) if row.is_empty() => {
                tracing::trace!(%table, "looking up columns for default row");
                Ok(self
                    .catalog
                    .table_schema(table.as_str())?
                    .map(|schema| schema.columns.len())
                    .unwrap_or_default())
            }
            _ => Ok(0),
        }
    }
}

impl<C: Catalog> DialectBuilder for Db2Builder<C> {
    fn insert<T: IntoIdent>(
        &self,
        table: T,
        source: InsertSource,
        params: Params,
    ) -> Result<Statement> {
        let table = table.into_ident();
        let default_columns = self.default_columns(&table, &source)?;
        Ok(build_insert(&table, &source, default_columns, params))
    }

    fn upsert<T, U>(
        &self,
        table: T,
        source: InsertSource,
        update: U,
        params: Params,
    ) -> Result<Statement>
    where
        T: IntoIdent,
        U: Into<UpdateColumns>,
    {
        let table = table.into_ident();
        let update = update.into();

        tracing::trace!(%table, "looking up unique constraints");
        let constraints = self.catalog.unique_constraints(table.as_str())?;
        let constraints = applicable_constraints(constraints, &source.columns());
        if constraints.is_empty() {
            tracing::debug!(%table, "no applicable unique constraint, upsert falls back to insert");
            let default_columns = self.default_columns(&table, &source)?;
            return Ok(build_insert(&table, &source, default_columns, params));
        }

        let merge = MergeStatement {
            table: &table,
            source: &source,
            update: &update,
            constraints: &constraints,
            alias: &self.config.source_alias,
            dummy_table: &self.config.dummy_table,
        };
        Ok(build_merge(&merge, params))
    }

    fn alter_column<T, N>(&self, table: T, column: N, ty: &str) -> String
    where
        T: IntoIdent,
        N: IntoIdent,
    {
        let ty = self.config.type_map.column_type(ty);
        Ddl::AlterColumnType {
            table: &table.into_ident(),
            column: &column.into_ident(),
            ty: &ty,
        }
        .to_sql()
    }

    fn reset_sequence(&self, table: &str, value: Option<i64>) -> Result<String> {
        ddl::reset_sequence(&self.catalog, table, value)
    }

    fn check_integrity(
        &self,
        check: bool,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<String> {
        ddl::check_integrity(&self.catalog, check, schema, table)
    }
}
