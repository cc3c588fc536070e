//! Rendering of compiled queries as parameterised PostgreSQL.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crudkit_core::types::{FieldKind, FieldValue, PageRequest, SortOrder};

use super::{EntityQuery, OrderBy, Predicate};

/// Append ` WHERE ...` for a non-empty predicate.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    for (i, condition) in predicate.conditions().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(condition.property.column);
        builder.push(format!(" {} ", condition.operator.as_sql()));
        push_value(builder, &condition.value, condition.property.kind);
    }
}

/// Append the `ORDER BY` clause.
///
/// Nulls come first ascending and last descending, and ties fall back to
/// `id_column`, matching [`OrderBy::compare`] over rows kept in id order.
/// A windowed query without a sort key is still ordered by `id_column` so
/// pages never overlap.
pub fn push_order_by(
    builder: &mut QueryBuilder<'_, Postgres>,
    order_by: Option<&OrderBy>,
    id_column: &str,
    windowed: bool,
) {
    let key = order_by.and_then(|o| {
        let nulls = match o.direction {
            SortOrder::Desc => "NULLS LAST",
            _ => "NULLS FIRST",
        };
        o.direction.as_sql().map(|dir| (o.property.column, dir, nulls))
    });

    match key {
        Some((column, dir, nulls)) => {
            builder.push(format!(" ORDER BY {column} {dir} {nulls}"));
            if column != id_column {
                builder.push(format!(", {id_column} ASC"));
            }
        }
        None if windowed => {
            builder.push(format!(" ORDER BY {id_column} ASC"));
        }
        None => {}
    }
}

/// Append ` LIMIT $n OFFSET $m` for a page window.
pub fn push_window(builder: &mut QueryBuilder<'_, Postgres>, window: Option<PageRequest>) {
    if let Some(page) = window {
        builder.push(" LIMIT ");
        builder.push_bind(clamp_i64(page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(clamp_i64(page.offset()));
    }
}

/// Render a full `SELECT *` for the query.
pub fn select<'a>(table: &str, id_column: &str, query: &EntityQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {table}"));
    push_where(&mut builder, &query.predicate);
    push_order_by(
        &mut builder,
        query.order_by.as_ref(),
        id_column,
        query.window.is_some(),
    );
    push_window(&mut builder, query.window);
    builder
}

/// Render `SELECT COUNT(*)` for the predicate.
pub fn count<'a>(table: &str, predicate: &Predicate) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_where(&mut builder, predicate);
    builder
}

/// Bind one value. Nulls are bound with the column's type so Postgres can
/// infer the parameter.
pub fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FieldValue, kind: FieldKind) {
    match value {
        FieldValue::Integer(v) => builder.push_bind(*v),
        FieldValue::Float(v) => builder.push_bind(*v),
        FieldValue::Bool(v) => builder.push_bind(*v),
        FieldValue::Text(v) => builder.push_bind(v.clone()),
        FieldValue::Timestamp(v) => builder.push_bind(*v),
        FieldValue::Null => match kind {
            FieldKind::Integer => builder.push_bind(None::<i64>),
            FieldKind::Float => builder.push_bind(None::<f64>),
            FieldKind::Boolean => builder.push_bind(None::<bool>),
            FieldKind::Timestamp => builder.push_bind(None::<DateTime<Utc>>),
            FieldKind::Text | FieldKind::Relation => builder.push_bind(None::<String>),
        },
    };
}

fn clamp_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
