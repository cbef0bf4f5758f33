use std::sync::LazyLock;

use crate::{
    bind::Params,
    expr::order::Order,
    template::{SlotValues, Template},
    writer::render,
};

/// Name of the synthetic row number column added by offset emulation.
///
/// It shows up in the result set, callers reusing a paged fragment in an
/// `INSERT ... SELECT` must project it away themselves.
pub const ROW_NUMBER_COLUMN: &str = "RN_";

static FETCH_FIRST: LazyLock<Template> = LazyLock::new(|| {
    Template::parse(":query FETCH FIRST :limit ROWS ONLY").expect("fetch first skeleton")
});

static ROW_NUMBER: LazyLock<Template> = LazyLock::new(|| {
    Template::parse(
        "SELECT * FROM (SELECT SUBQUERY_.*, ROW_NUMBER() OVER(:order) AS RN_ \
         FROM ( :query ) AS SUBQUERY_) AS t WHERE :offset:limit",
    )
    .expect("row number skeleton")
});

/// Which rewrite a limit/offset pair calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Nothing to bound, the fragment is returned as is.
    Unbounded,
    /// `FETCH FIRST n ROWS ONLY` appended to the fragment.
    FetchFirst(u64),
    /// Row numbering window filtered on `RN_`.
    RowNumber { offset: u64, limit: Option<u64> },
}

impl Strategy {
    /// A zero offset skips nothing and counts as no offset.
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        match (limit, offset.filter(|offset| *offset > 0)) {
            (None, None) => Strategy::Unbounded,
            (Some(limit), None) => Strategy::FetchFirst(limit),
            (limit, Some(offset)) => Strategy::RowNumber { offset, limit },
        }
    }
}

/// `ORDER BY ...` clause for the keys, empty when there are none.
pub(crate) fn order_by_clause(order: &Order) -> String {
    if order.is_empty() {
        return String::new();
    }
    let (keys, _) = render(order, Params::new());
    format!("ORDER BY {keys}")
}

/// Bound `fragment` to `limit` rows after skipping `offset` rows.
///
/// With an offset the fragment is wrapped in a row numbering subquery whose
/// window is ordered by the normalized `order`, an empty order gives a bare
/// `OVER()`. Row numbers are only as deterministic as the order keys.
pub fn rewrite_pagination(
    fragment: &str,
    order: &Order,
    limit: Option<u64>,
    offset: Option<u64>,
) -> String {
    let strategy = Strategy::new(limit, offset);
    tracing::debug!(?strategy, "rewriting pagination");
    match strategy {
        Strategy::Unbounded => fragment.to_owned(),
        Strategy::FetchFirst(limit) => FETCH_FIRST.render(&SlotValues {
            query: fragment,
            limit: &limit.to_string(),
            ..Default::default()
        }),
        Strategy::RowNumber { offset, limit } => {
            let order = order_by_clause(&order.normalize());
            let lower = format!("{ROW_NUMBER_COLUMN} > {offset}");
            let upper = limit
                .map(|limit| format!(" AND {ROW_NUMBER_COLUMN} <= {}", offset.saturating_add(limit)))
                .unwrap_or_default();
            ROW_NUMBER.render(&SlotValues {
                query: fragment,
                order: &order,
                offset: &lower,
                limit: &upper,
            })
        }
    }
}

/// Attach ordering and paging to a built `SELECT`.
///
/// Without paging the keys are appended as given in `ORDER BY`. With a limit
/// only, the fragment is ordered before `FETCH FIRST` applies. With an offset
/// the ordering moves into the row numbering window.
pub fn build_order_by_and_limit(
    sql: &str,
    order: &Order,
    limit: Option<u64>,
    offset: Option<u64>,
) -> String {
    match Strategy::new(limit, offset) {
        Strategy::RowNumber { .. } => rewrite_pagination(sql, order, limit, offset),
        _ => {
            let clause = order_by_clause(order);
            let ordered = if clause.is_empty() {
                sql.to_owned()
            } else {
                format!("{sql} {clause}")
            };
            rewrite_pagination(&ordered, order, limit, offset)
        }
    }
}
