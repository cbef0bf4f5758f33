use std::fmt;

use crate::{
    Ident, Raw,
    ident::IntoIdent,
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderExpr {
    /// A named key, bare (`id`), qualified (`t.id`) or an expression string.
    Column(Ident, Ordering),
    /// An expression object, carries its own direction and is never rewritten.
    Raw(Raw),
}

impl FormatWriter for OrderExpr {
    fn format_writer<W: fmt::Write>(&self, context: &mut FormatContext<'_, W>) -> fmt::Result {
        match self {
            OrderExpr::Column(ident, ordering) => {
                ident.format_writer(context)?;
                context.writer.write_char(' ')?;
                ordering.format_writer(context)
            }
            OrderExpr::Raw(raw) => raw.format_writer(context),
        }
    }
}

/// Ordered sequence of sort keys.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    projections: Vec<OrderExpr>,
}

impl FormatWriter for Order {
    fn format_writer<W: fmt::Write>(&self, context: &mut FormatContext<'_, W>) -> fmt::Result {
        context.write_list(&self.projections)
    }
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderExpr> {
        self.projections.iter()
    }

    pub fn push<I: IntoIdent>(&mut self, key: I, ordering: Ordering) -> &mut Self {
        self.projections
            .push(OrderExpr::Column(key.into_ident(), ordering));
        self
    }

    pub fn asc<I: IntoIdent>(&mut self, key: I) -> &mut Self {
        self.push(key, Ordering::Asc)
    }

    pub fn desc<I: IntoIdent>(&mut self, key: I) -> &mut Self {
        self.push(key, Ordering::Desc)
    }

    pub fn push_raw(&mut self, raw: Raw) -> &mut Self {
        self.projections.push(OrderExpr::Raw(raw));
        self
    }

    /// Strip qualifiers so every key is legal inside a window clause over
    /// the wrapped subquery: `t.id` becomes `id`.
    ///
    /// Any key holding a dot is cut at its last dot, including expression
    /// strings such as `LOWER(t.name)`. Expression objects pushed with
    /// [`Order::push_raw`] are left alone.
    pub fn normalize(&self) -> Order {
        let projections = self
            .projections
            .iter()
            .map(|proj| match proj {
                OrderExpr::Column(ident, ordering) if ident.is_qualified() => {
                    OrderExpr::Column(Ident::new(ident.last_segment()), *ordering)
                }
                other => other.clone(),
            })
            .collect();
        Order { projections }
    }
}

impl<K> FromIterator<(K, Ordering)> for Order
where
    K: IntoIdent,
{
    fn from_iter<T: IntoIterator<Item = (K, Ordering)>>(iter: T) -> Self {
        let projections = iter
            .into_iter()
            .map(|(key, ordering)| OrderExpr::Column(key.into_ident(), ordering))
            .collect();
        Order { projections }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Asc,
    Desc,
}

impl FormatWriter for Ordering {
    fn format_writer<W: fmt::Write>(&self, context: &mut FormatContext<'_, W>) -> fmt::Result {
        match self {
            Ordering::Asc => context.writer.write_str("ASC"),
            Ordering::Desc => context.writer.write_str("DESC"),
        }
    }
}
