//! PostgreSQL store driven by the entity schema.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crudkit_core::error::{AppError, ErrorKind};
use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, PropertyDef};
use crudkit_core::types::FieldValue;

use super::EntityStore;
use crate::query::{EntityQuery, Predicate, sql};

/// Store that reads and writes `E::TABLE` through sqlx.
///
/// Column lists for inserts and updates come from the scalar properties
/// of `E::schema()`; the identifier column is never written.
pub struct PgStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PgStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for PgStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore").finish_non_exhaustive()
    }
}

impl<E> PgStore<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow> + Unpin,
{
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn id_column() -> &'static str {
        E::find_property(E::ID_PROPERTY)
            .map(|p| p.column)
            .unwrap_or("id")
    }

    fn writable_columns() -> Vec<&'static PropertyDef> {
        E::scalar_properties()
            .into_iter()
            .filter(|p| !p.name.eq_ignore_ascii_case(E::ID_PROPERTY))
            .collect()
    }

    fn db_error(action: &str, err: sqlx::Error) -> AppError {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to {action} {}", E::NAME),
            err,
        )
    }
}

#[async_trait]
impl<E> EntityStore<E> for PgStore<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow> + Unpin,
{
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE {} = ",
            E::TABLE,
            Self::id_column()
        ));
        builder.push_bind(id);

        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("find", e))
    }

    async fn fetch(&self, query: &EntityQuery) -> AppResult<Vec<E>> {
        let mut builder = sql::select(E::TABLE, Self::id_column(), query);
        debug!(entity = E::NAME, sql = builder.sql(), "Fetching rows");

        builder
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("query", e))
    }

    async fn count(&self, predicate: &Predicate) -> AppResult<u64> {
        let mut builder = sql::count(E::TABLE, predicate);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("count", e))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn insert(&self, entity: &E) -> AppResult<E> {
        let columns = Self::writable_columns();
        let column_list = columns
            .iter()
            .map(|p| p.column)
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({column_list}) VALUES (", E::TABLE));
        for (i, property) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            let value = entity.property(property.name).unwrap_or(FieldValue::Null);
            sql::push_value(&mut builder, &value, property.kind);
        }
        builder.push(") RETURNING *");

        builder
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("insert", e))
    }

    async fn update(&self, entity: &E) -> AppResult<Option<E>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
        for (i, property) in Self::writable_columns().iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(property.column);
            builder.push(" = ");
            let value = entity.property(property.name).unwrap_or(FieldValue::Null);
            sql::push_value(&mut builder, &value, property.kind);
        }
        builder.push(format!(" WHERE {} = ", Self::id_column()));
        builder.push_bind(entity.id());
        builder.push(" RETURNING *");

        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("update", e))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1",
            E::TABLE,
            Self::id_column()
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
