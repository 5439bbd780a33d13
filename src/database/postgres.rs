//! PostgreSQL executor backed by an SQLx pool.

use super::QueryExecutor;
use crate::error::Result;
use crate::models::Record;
use crate::query_builder::{Assignment, BindValue, QueryBuilder};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};
use tracing::debug;
use uuid::Uuid;

/// Executes moderated queries with SQLx against PostgreSQL
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool to the given database URL
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<u64> {
        debug!(sql = %sql, params = params.len(), "Executing moderation statement");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>> {
        let sql = query.build_sql();
        debug!(sql = %sql, "Fetching moderated rows");
        let rows = bind_all(sqlx::query(&sql), query.where_bindings())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn count(&self, query: &QueryBuilder) -> Result<u64> {
        let sql = query.build_count_sql();
        let row = bind_all(sqlx::query(&sql), query.where_bindings())
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn update(&self, query: &QueryBuilder, assignments: &[Assignment]) -> Result<u64> {
        let (sql, params) = query.build_update_sql(assignments);
        self.execute(&sql, &params).await
    }

    async fn delete(&self, query: &QueryBuilder) -> Result<u64> {
        let sql = query.build_delete_sql();
        self.execute(&sql, query.where_bindings()).await
    }

    async fn save(
        &self,
        table: &str,
        key_column: &str,
        key: &BindValue,
        changes: &[Assignment],
    ) -> Result<bool> {
        let (sql, params) = QueryBuilder::new(table)
            .where_eq(key_column, key.clone())
            .build_update_sql(changes);
        Ok(self.execute(&sql, &params).await? > 0)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in params {
        query = bind_value(query, value);
    }
    query
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &BindValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        BindValue::Null => query.bind(None::<String>),
        BindValue::Bool(v) => query.bind(*v),
        BindValue::Int(v) => query.bind(*v),
        BindValue::Float(v) => query.bind(*v),
        BindValue::Text(v) => query.bind(v.clone()),
        BindValue::Uuid(v) => query.bind(*v),
        BindValue::Timestamp(v) => query.bind(*v),
    }
}

/// Decode a row into a [`Record`] by inspecting each column's PostgreSQL type
fn decode_row(row: &PgRow) -> Result<Record> {
    let mut record = Record::new();
    for column in row.columns() {
        let index = column.ordinal();
        let value = match column.type_info().name() {
            "BOOL" => BindValue::from(row.try_get::<Option<bool>, _>(index)?),
            "INT2" => BindValue::from(row.try_get::<Option<i16>, _>(index)?.map(i64::from)),
            "INT4" => BindValue::from(row.try_get::<Option<i32>, _>(index)?.map(i64::from)),
            "INT8" => BindValue::from(row.try_get::<Option<i64>, _>(index)?),
            "FLOAT4" => BindValue::from(row.try_get::<Option<f32>, _>(index)?.map(f64::from)),
            "FLOAT8" => BindValue::from(row.try_get::<Option<f64>, _>(index)?),
            "UUID" => BindValue::from(row.try_get::<Option<Uuid>, _>(index)?),
            "TIMESTAMPTZ" => BindValue::from(row.try_get::<Option<DateTime<Utc>>, _>(index)?),
            "TIMESTAMP" => BindValue::from(
                row.try_get::<Option<NaiveDateTime>, _>(index)?
                    .map(|t| t.and_utc()),
            ),
            "JSON" | "JSONB" => BindValue::from(
                row.try_get::<Option<serde_json::Value>, _>(index)?
                    .map(|v| v.to_string()),
            ),
            // text, varchar and enum labels all arrive as UTF-8
            _ => BindValue::from(row.try_get_unchecked::<Option<String>, _>(index)?),
        };
        record.set(column.name(), value);
    }
    Ok(record)
}
