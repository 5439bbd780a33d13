//! # Moderation Scope
//!
//! Default visibility predicate for moderated entities and the bookkeeping
//! that lets modifiers swap it out.
//!
//! Every query built through [`ModerationScope::query`] starts with one status
//! constraint: `status = approved` in strict mode, `status IN (approved,
//! pending)` otherwise. Modifiers and transitions call
//! [`ModerationScope::remove`] before adding their own, so a query never holds
//! more than one moderation constraint.

use super::ModeratedQuery;
use crate::config::{ModerationConfig, StatusLabels};
use crate::constants::ModerationStatus;
use crate::error::{ModerationError, Result};
use crate::models::{Moderatable, Record};
use crate::query_builder::{BindValue, DeleteHook, QueryBuilder, WhereClause};
use std::sync::Arc;
use tracing::debug;

/// Installs and removes moderation constraints on queries
#[derive(Debug, Clone)]
pub struct ModerationScope {
    config: Arc<ModerationConfig>,
}

impl ModerationScope {
    pub fn new(config: ModerationConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    pub fn labels(&self) -> &StatusLabels {
        &self.config.status
    }

    /// Storage label for a status, as a bindable value
    pub fn label(&self, status: ModerationStatus) -> BindValue {
        BindValue::from(self.config.status.label(status))
    }

    /// Per-entity override, else the global setting
    pub fn is_strict<M: Moderatable>(&self) -> bool {
        M::strict_moderation().unwrap_or(self.config.strict)
    }

    /// Start a query against `M` with the default predicate applied
    pub fn query<M: Moderatable>(&self) -> ModeratedQuery<M> {
        let mut query = QueryBuilder::new(M::table_name());
        self.inject_default::<M>(&mut query);
        ModeratedQuery::from_parts(self.clone(), query)
    }

    /// Wrap an existing builder, replacing any moderation constraint it holds
    pub fn scope<M: Moderatable>(&self, mut query: QueryBuilder) -> Result<ModeratedQuery<M>> {
        self.apply::<M>(&mut query)?;
        Ok(ModeratedQuery::from_parts(self.clone(), query))
    }

    /// Apply the default predicate and register delete interception
    pub fn apply<M: Moderatable>(&self, query: &mut QueryBuilder) -> Result<()> {
        Self::remove::<M>(query)?;
        self.inject_default::<M>(query);
        Ok(())
    }

    fn inject_default<M: Moderatable>(&self, query: &mut QueryBuilder) {
        // qualified so that joins added later cannot make it ambiguous
        let column = M::qualified_status_column();
        if self.is_strict::<M>() {
            query.push_where(
                WhereClause::basic(column, "="),
                vec![self.label(ModerationStatus::Approved)],
            );
        } else {
            let values = vec![
                self.label(ModerationStatus::Approved),
                self.label(ModerationStatus::Pending),
            ];
            query.push_where(
                WhereClause::In {
                    column,
                    count: values.len(),
                },
                values,
            );
        }

        query.on_delete(DeleteHook::Stamp {
            column: M::moderated_at_column().to_string(),
        });

        debug!(
            table = M::table_name(),
            strict = self.is_strict::<M>(),
            "Applied default moderation scope"
        );
    }

    /// Constrain the status column to the given statuses
    ///
    /// One status becomes an equality, several a membership test. Does not
    /// remove existing constraints; callers do that first.
    pub(crate) fn constrain<M: Moderatable>(
        &self,
        query: &mut QueryBuilder,
        statuses: &[ModerationStatus],
    ) {
        let column = Self::status_column::<M>(query);
        let values: Vec<BindValue> = statuses.iter().map(|s| self.label(*s)).collect();
        let clause = match values.len() {
            1 => WhereClause::basic(column, "="),
            count => WhereClause::In { column, count },
        };
        query.push_where(clause, values);
    }

    /// Status column to constrain: qualified once the query joins other tables
    pub fn status_column<M: Moderatable>(query: &QueryBuilder) -> String {
        if query.has_joins() {
            M::qualified_status_column()
        } else {
            M::status_column().to_string()
        }
    }

    /// Whether a clause constrains `M`'s status column, whatever its operator
    pub fn is_moderation_constraint<M: Moderatable>(clause: &WhereClause) -> bool {
        clause.column().is_some_and(|column| {
            column == M::status_column() || column == M::qualified_status_column()
        })
    }

    /// Strip every moderation constraint and its bindings from `query`
    ///
    /// Walks the clauses in order with a cursor into the where-bindings that
    /// advances by each clause's binding count (zero for null checks). Matched
    /// clauses and the bindings under the cursor are removed, back to front so
    /// earlier positions stay valid. Returns how many clauses were removed;
    /// calling it on a query without moderation constraints changes nothing.
    ///
    /// Fails with [`ModerationError::InconsistentBinding`], leaving the query
    /// untouched, when the clauses need a different number of bindings than
    /// the query holds.
    pub fn remove<M: Moderatable>(query: &mut QueryBuilder) -> Result<usize> {
        let required: usize = query.wheres().iter().map(WhereClause::binding_count).sum();
        let available = query.where_bindings().len();
        if required != available {
            return Err(ModerationError::InconsistentBinding {
                position: required,
                available,
            });
        }

        let mut binding_key = 0;
        let mut removals = Vec::new();
        for (index, clause) in query.wheres().iter().enumerate() {
            let count = clause.binding_count();
            if Self::is_moderation_constraint::<M>(clause) {
                removals.push((index, binding_key..binding_key + count));
            }
            binding_key += count;
        }

        for (index, bindings) in removals.iter().rev() {
            query.remove_where(*index);
            for position in bindings.clone().rev() {
                query.remove_where_binding(position);
            }
        }

        if !removals.is_empty() {
            debug!(
                table = query.table(),
                removed = removals.len(),
                remaining = query.wheres().len(),
                "Removed moderation constraints"
            );
        }

        Ok(removals.len())
    }

    /// Moderation status of a loaded record, if its label is known
    pub fn status_of<M: Moderatable>(&self, record: &Record) -> Option<ModerationStatus> {
        self.labels()
            .status_of(record.value(M::status_column()).as_str()?)
    }

    pub fn is_pending<M: Moderatable>(&self, record: &Record) -> bool {
        self.status_of::<M>(record) == Some(ModerationStatus::Pending)
    }

    pub fn is_approved<M: Moderatable>(&self, record: &Record) -> bool {
        self.status_of::<M>(record) == Some(ModerationStatus::Approved)
    }

    pub fn is_rejected<M: Moderatable>(&self, record: &Record) -> bool {
        self.status_of::<M>(record) == Some(ModerationStatus::Rejected)
    }

    pub fn is_postponed<M: Moderatable>(&self, record: &Record) -> bool {
        self.status_of::<M>(record) == Some(ModerationStatus::Postponed)
    }
}
