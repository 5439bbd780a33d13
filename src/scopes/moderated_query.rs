use super::ModerationScope;
use crate::auth::ActorResolver;
use crate::constants::ModerationStatus;
use crate::database::QueryExecutor;
use crate::error::{ModerationError, Result};
use crate::models::{Moderatable, Record};
use crate::query_builder::{Assignment, BindValue, DeleteHook, QueryBuilder};
use std::fmt;
use std::marker::PhantomData;
use tracing::info;

/// Result of a moderation transition
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Single-record mode: the record with its new status applied
    Record(Record),
    /// Bulk mode: rows updated
    Bulk { affected: u64 },
}

impl TransitionOutcome {
    pub fn affected(&self) -> u64 {
        match self {
            TransitionOutcome::Record(_) => 1,
            TransitionOutcome::Bulk { affected } => *affected,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            TransitionOutcome::Record(record) => Some(record),
            TransitionOutcome::Bulk { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            TransitionOutcome::Record(record) => Some(record),
            TransitionOutcome::Bulk { .. } => None,
        }
    }
}

/// A query against a moderated entity `M`
///
/// Wraps a [`QueryBuilder`] that carries exactly one moderation constraint.
/// Modifiers swap that constraint; transitions drop it so they can reach any
/// row regardless of status.
pub struct ModeratedQuery<M: Moderatable> {
    scope: ModerationScope,
    query: QueryBuilder,
    _entity: PhantomData<fn() -> M>,
}

impl<M: Moderatable> Clone for ModeratedQuery<M> {
    fn clone(&self) -> Self {
        Self::from_parts(self.scope.clone(), self.query.clone())
    }
}

impl<M: Moderatable> fmt::Debug for ModeratedQuery<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeratedQuery")
            .field("entity", &M::table_name())
            .field("query", &self.query)
            .finish()
    }
}

impl<M: Moderatable> ModeratedQuery<M> {
    /// Fresh query against `M` with the default predicate applied
    pub fn new(scope: &ModerationScope) -> Self {
        scope.query::<M>()
    }

    pub(crate) fn from_parts(scope: ModerationScope, query: QueryBuilder) -> Self {
        Self {
            scope,
            query,
            _entity: PhantomData,
        }
    }

    pub fn scope(&self) -> &ModerationScope {
        &self.scope
    }

    /// Status of a record loaded through this query
    pub fn status_of(&self, record: &Record) -> Option<ModerationStatus> {
        self.scope.status_of::<M>(record)
    }

    pub fn query(&self) -> &QueryBuilder {
        &self.query
    }

    /// Mutable access for constraints the passthroughs below don't cover
    pub fn query_mut(&mut self) -> &mut QueryBuilder {
        &mut self.query
    }

    pub fn into_query(self) -> QueryBuilder {
        self.query
    }

    /// Transform the underlying builder
    pub fn map(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        Self::from_parts(self.scope, f(self.query))
    }

    pub fn where_eq(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.map(|q| q.where_eq(column, value))
    }

    pub fn where_op(self, column: &str, operator: &str, value: impl Into<BindValue>) -> Self {
        self.map(|q| q.where_op(column, operator, value))
    }

    pub fn where_in<V: Into<BindValue>>(self, column: &str, values: Vec<V>) -> Self {
        self.map(|q| q.where_in(column, values))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.map(|q| q.where_null(column))
    }

    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.map(|q| q.inner_join(table, on_condition))
    }

    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.map(|q| q.left_join(table, on_condition))
    }

    pub fn order_asc(self, column: &str) -> Self {
        self.map(|q| q.order_asc(column))
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.map(|q| q.order_desc(column))
    }

    pub fn limit(self, limit: u32) -> Self {
        self.map(|q| q.limit(limit))
    }

    pub fn offset(self, offset: u32) -> Self {
        self.map(|q| q.offset(offset))
    }

    // ========================================================================
    // VISIBILITY MODIFIERS
    // ========================================================================

    /// Approved and pending records
    pub fn with_pending(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Approved, ModerationStatus::Pending])
    }

    /// Approved and rejected records
    pub fn with_rejected(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Approved, ModerationStatus::Rejected])
    }

    /// Approved and postponed records
    pub fn with_postponed(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Approved, ModerationStatus::Postponed])
    }

    /// Every record, whatever its status
    pub fn with_any_status(mut self) -> Result<Self> {
        ModerationScope::remove::<M>(&mut self.query)?;
        Ok(self)
    }

    /// Only pending records
    pub fn pending(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Pending])
    }

    /// Only rejected records
    pub fn rejected(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Rejected])
    }

    /// Only postponed records
    pub fn postponed(self) -> Result<Self> {
        self.restrict(&[ModerationStatus::Postponed])
    }

    fn restrict(mut self, statuses: &[ModerationStatus]) -> Result<Self> {
        ModerationScope::remove::<M>(&mut self.query)?;
        self.scope.constrain::<M>(&mut self.query, statuses);
        Ok(self)
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub async fn get<E>(&self, executor: &E) -> Result<Vec<Record>>
    where
        E: QueryExecutor + ?Sized,
    {
        executor.fetch_all(&self.query).await
    }

    pub async fn first<E>(&self, executor: &E) -> Result<Option<Record>>
    where
        E: QueryExecutor + ?Sized,
    {
        executor.fetch_optional(&self.query).await
    }

    pub async fn count<E>(&self, executor: &E) -> Result<u64>
    where
        E: QueryExecutor + ?Sized,
    {
        executor.count(&self.query).await
    }

    /// Look up one record by primary key within the current constraints
    ///
    /// With joins and no explicit projection only the entity's own columns
    /// are selected, so joined columns cannot shadow them.
    pub async fn find<E>(&self, executor: &E, key: impl Into<BindValue>) -> Result<Option<Record>>
    where
        E: QueryExecutor + ?Sized,
    {
        let mut query = self.query.clone();
        let column = if query.has_joins() {
            if query.select_fields() == ["*"] {
                let own_columns = format!("{}.*", M::table_name());
                query = query.select(&[own_columns.as_str()]);
            }
            M::qualified_key_name()
        } else {
            M::key_name().to_string()
        };
        let query = query.where_eq(&column, key).limit(1);
        executor.fetch_optional(&query).await
    }

    // ========================================================================
    // DELETES
    // ========================================================================

    /// Delete the matched records
    ///
    /// Queries carrying a delete stamp are turned into an update of the
    /// moderated-at column; rows stay in storage.
    pub async fn delete<E>(&self, executor: &E) -> Result<u64>
    where
        E: QueryExecutor + ?Sized,
    {
        match self.query.delete_hook() {
            Some(DeleteHook::Stamp { column }) => {
                let stamp = (column.clone(), BindValue::from(M::fresh_timestamp()));
                let affected = executor.update(&self.query, &[stamp]).await?;
                info!(
                    table = M::table_name(),
                    affected = affected,
                    "Intercepted delete with moderation stamp"
                );
                Ok(affected)
            }
            None => executor.delete(&self.query).await,
        }
    }

    /// Physically delete the matched records, bypassing the stamp
    pub async fn force_delete<E>(&self, executor: &E) -> Result<u64>
    where
        E: QueryExecutor + ?Sized,
    {
        let affected = executor.delete(&self.query).await?;
        info!(
            table = M::table_name(),
            affected = affected,
            "Force deleted moderated records"
        );
        Ok(affected)
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    pub async fn approve<E, A>(
        self,
        executor: &E,
        actor: &A,
        key: Option<BindValue>,
    ) -> Result<TransitionOutcome>
    where
        E: QueryExecutor + ?Sized,
        A: ActorResolver + ?Sized,
    {
        self.transition(executor, actor, ModerationStatus::Approved, key)
            .await
    }

    pub async fn reject<E, A>(
        self,
        executor: &E,
        actor: &A,
        key: Option<BindValue>,
    ) -> Result<TransitionOutcome>
    where
        E: QueryExecutor + ?Sized,
        A: ActorResolver + ?Sized,
    {
        self.transition(executor, actor, ModerationStatus::Rejected, key)
            .await
    }

    pub async fn postpone<E, A>(
        self,
        executor: &E,
        actor: &A,
        key: Option<BindValue>,
    ) -> Result<TransitionOutcome>
    where
        E: QueryExecutor + ?Sized,
        A: ActorResolver + ?Sized,
    {
        self.transition(executor, actor, ModerationStatus::Postponed, key)
            .await
    }

    /// Move records to `status`, stamping moderated-at and moderated-by
    ///
    /// With a key, the one record with that key (under the query's other
    /// constraints, any status) is loaded, changed and saved; a missing record
    /// is [`ModerationError::NotFound`]. Without a key, every record the query
    /// matches is updated in a single statement.
    ///
    /// When `M` records a moderator, the actor is resolved before storage is
    /// touched and a missing actor is [`ModerationError::Unauthenticated`].
    pub async fn transition<E, A>(
        self,
        executor: &E,
        actor: &A,
        status: ModerationStatus,
        key: Option<BindValue>,
    ) -> Result<TransitionOutcome>
    where
        E: QueryExecutor + ?Sized,
        A: ActorResolver + ?Sized,
    {
        let moderator = match M::moderated_by_column() {
            Some(column) => {
                let id = actor
                    .current_actor()
                    .ok_or_else(|| ModerationError::Unauthenticated {
                        table: M::table_name().to_string(),
                    })?;
                Some((column, id))
            }
            None => None,
        };

        let query = self.with_any_status()?;

        let mut changes: Vec<Assignment> = vec![
            (M::status_column().to_string(), query.scope.label(status)),
            (
                M::moderated_at_column().to_string(),
                BindValue::from(M::fresh_timestamp()),
            ),
        ];
        if let Some((column, id)) = moderator {
            changes.push((column.to_string(), BindValue::from(id)));
        }

        let Some(key) = key else {
            let affected = executor.update(&query.query, &changes).await?;
            info!(
                table = M::table_name(),
                status = %status,
                affected = affected,
                "Moderated records in bulk"
            );
            return Ok(TransitionOutcome::Bulk { affected });
        };

        let mut record = query
            .find(executor, key.clone())
            .await?
            .ok_or_else(|| ModerationError::not_found(M::table_name(), &key))?;

        for (column, value) in &changes {
            record.set(column, value.clone());
        }

        if !executor
            .save(M::table_name(), M::key_name(), &key, &changes)
            .await?
        {
            return Err(ModerationError::not_found(M::table_name(), &key));
        }

        info!(
            table = M::table_name(),
            key = %key,
            status = %status,
            "Moderated record"
        );
        Ok(TransitionOutcome::Record(record))
    }
}
