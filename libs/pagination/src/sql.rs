//! Renders keyset queries into Postgres SQL.
//!
//! Entity repositories write their own `SELECT ... WHERE <domain filters>`
//! and append the seek predicate and ordering from here, so the predicate is
//! defined once for every table.

use sqlx::{Postgres, QueryBuilder};

use crate::cursor::CursorValue;
use crate::engine::{KeysetPredicate, KeysetQuery};
use crate::error::RequestError;
use crate::sort::{SortField, SortSpec};

/// Column names backing each sort field for one table.
///
/// Names are interpolated verbatim and must be trusted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumns {
    pub id: &'static str,
    pub name: &'static str,
    pub created_at: &'static str,
    pub level: Option<&'static str>,
}

impl SortColumns {
    /// Columns for a table with the conventional `id`, `name`, `created_at`.
    pub const DEFAULT: Self = Self {
        id: "id",
        name: "name",
        created_at: "created_at",
        level: None,
    };

    #[must_use]
    pub const fn with_level(mut self, column: &'static str) -> Self {
        self.level = Some(column);
        self
    }

    /// Returns the column for a sort, if this table has one.
    pub fn column(&self, sort: SortSpec) -> Result<&'static str, RequestError> {
        match sort.field {
            SortField::Name => Ok(self.name),
            SortField::CreatedAt => Ok(self.created_at),
            SortField::Level => self.level.ok_or(RequestError::UnsupportedSort(sort)),
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &CursorValue) {
    match value {
        CursorValue::Text(s) => builder.push_bind(s.clone()),
        CursorValue::Timestamp(t) => builder.push_bind(*t),
        CursorValue::Integer(n) => builder.push_bind(*n),
    };
}

/// Appends `(col <op> $a OR (col = $b AND id > $c))`.
///
/// `<op>` is `>` for ascending sorts and `<` for descending ones.
pub fn push_keyset_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &SortColumns,
    predicate: &KeysetPredicate,
) -> Result<(), RequestError> {
    let sort = SortSpec {
        field: predicate.field,
        direction: predicate.direction,
    };
    let column = columns.column(sort)?;
    let op = if predicate.direction.is_descending() { "<" } else { ">" };

    builder.push(format_args!("({column} {op} "));
    push_value(builder, &predicate.value);
    builder.push(format_args!(" OR ({column} = "));
    push_value(builder, &predicate.value);
    builder.push(format_args!(" AND {} > ", columns.id));
    builder.push_bind(*predicate.after_id.as_uuid());
    builder.push("))");

    Ok(())
}

/// Appends ` ORDER BY col {ASC|DESC}, id ASC LIMIT $n`.
pub fn push_order_and_limit(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &SortColumns,
    query: &KeysetQuery,
) -> Result<(), RequestError> {
    let column = columns.column(query.sort)?;

    builder.push(format_args!(
        " ORDER BY {column} {}, {} ASC LIMIT ",
        query.sort.direction.as_sql(),
        columns.id
    ));
    builder.push_bind(i64::try_from(query.fetch_limit).unwrap_or(i64::MAX));

    Ok(())
}

/// Appends the seek predicate (joined with `AND` when `has_filters`) and the
/// ordering for a full keyset query.
pub fn push_keyset_query(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &SortColumns,
    query: &KeysetQuery,
    has_filters: bool,
) -> Result<(), RequestError> {
    if let Some(predicate) = &query.after {
        builder.push(if has_filters { " AND " } else { " WHERE " });
        push_keyset_predicate(builder, columns, predicate)?;
    }
    push_order_and_limit(builder, columns, query)
}
