use crate::error::Result;
use crate::models::Record;
use crate::query_builder::{Assignment, BindValue, QueryBuilder};
use async_trait::async_trait;

/// Runs built queries against a storage engine
///
/// Implementations decide how a [`QueryBuilder`] is executed; the moderation
/// scopes only ever talk to storage through this trait.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// All rows matched by the query
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>>;

    /// First row matched by the query, if any
    async fn fetch_optional(&self, query: &QueryBuilder) -> Result<Option<Record>> {
        let rows = self.fetch_all(&query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Number of rows matched by the query, ignoring pagination
    async fn count(&self, query: &QueryBuilder) -> Result<u64>;

    /// Apply the assignments to every matched row; returns rows affected
    async fn update(&self, query: &QueryBuilder, assignments: &[Assignment]) -> Result<u64>;

    /// Physically delete every matched row; returns rows affected
    async fn delete(&self, query: &QueryBuilder) -> Result<u64>;

    /// Persist changes to the single row whose `key_column` equals `key`
    ///
    /// Returns `false` when no such row exists.
    async fn save(
        &self,
        table: &str,
        key_column: &str,
        key: &BindValue,
        changes: &[Assignment],
    ) -> Result<bool>;
}
