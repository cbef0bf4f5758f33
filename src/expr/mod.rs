use crate::{
    Ident, Raw,
    bind::{Bind, Binds, IntoBind, IntoBinds},
    ident::IntoIdent,
    raw::IntoRaw,
    writer::{FormatContext, FormatWriter},
};

pub mod cond;
pub mod order;

/// A value position: an inserted value, an assignment right hand side or a
/// projected column.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bound through a generated placeholder.
    Bind(Bind),
    /// Reference to another column.
    Column(Ident),
    /// Verbatim SQL with `?` markers for its own values.
    Raw(Raw, Binds),
}

impl Expr {
    pub fn raw<R, B>(raw: R, binds: B) -> Self
    where
        R: IntoRaw,
        B: IntoBinds,
    {
        Self::Raw(raw.into_raw(), binds.into_binds())
    }

    pub fn column<I: IntoIdent>(ident: I) -> Self {
        Self::Column(ident.into_ident())
    }

    /// Plain values that need no evaluation context.
    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Bind(_))
    }
}

pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl<T> IntoExpr for T
where
    T: IntoBind,
{
    fn into_expr(self) -> Expr {
        Expr::Bind(self.into_bind())
    }
}

impl IntoExpr for Raw {
    fn into_expr(self) -> Expr {
        Expr::Raw(self, Binds::new())
    }
}

impl IntoExpr for Ident {
    fn into_expr(self) -> Expr {
        Expr::Column(self)
    }
}

impl FormatWriter for Expr {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Expr::Bind(bind) => context.write_placeholder(bind.clone()),
            Expr::Column(ident) => ident.format_writer(context),
            Expr::Raw(raw, binds) => raw.format_with_binds(context, binds),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{bind::Params, writer::render};

    use super::*;

    #[test]
    fn test_into_expr() {
        assert_eq!(Expr::Bind(Bind::I64(3)), 3i64.into_expr());
        assert_eq!(Expr::Bind(Bind::Null), None::<i32>.into_expr());
        assert_eq!(
            Expr::Column(Ident::new_static("t.id")),
            Ident::new_static("t.id").into_expr()
        );
        assert!(Expr::Bind(Bind::Null).is_value());
        assert!(!Expr::column("id").is_value());
    }

    #[test]
    fn test_format_expr() {
        let (sql, params) = render(&Expr::raw("COALESCE(?, \"n\")", "x"), Params::new());
        assert_eq!("COALESCE(:qp0, \"n\")", sql);
        assert_eq!(1, params.len());

        let (sql, params) = render(&Expr::column("t.name"), params);
        assert_eq!("\"t\".\"name\"", sql);
        assert_eq!(1, params.len());

        let (sql, params) = render(&Expr::Bind(Bind::Bool(true)), params);
        assert_eq!(":qp1", sql);
        assert_eq!(2, params.len());
    }
}
