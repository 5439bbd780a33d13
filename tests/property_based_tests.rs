mod common;

use common::strategies::*;
use common::{scope, Post};
use moderation_core::{
    BindValue, MemoryExecutor, ModeratedQuery, ModerationScope, ModerationStatus, QueryBuilder,
    Record, WhereClause,
};
use proptest::prelude::*;

/// Build a query from clause specs, returning the bindings that belong to
/// non-moderation clauses in order
fn build(specs: &[ClauseSpec]) -> (QueryBuilder, Vec<BindValue>) {
    let mut query = QueryBuilder::new("posts");
    let mut kept = Vec::new();
    for spec in specs {
        let before = query.where_bindings().len();
        query = match spec {
            ClauseSpec::Eq(column, value) => query.where_eq(column, *value),
            ClauseSpec::In(column, values) => query.where_in(column, values.clone()),
            ClauseSpec::NotIn(column, values) => query.where_not_in(column, values.clone()),
            ClauseSpec::Raw(sql, values) => {
                query.where_raw(sql, values.iter().copied().map(BindValue::from).collect())
            }
            ClauseSpec::Null(column) => query.where_null(column),
            ClauseSpec::NotNull(column) => query.where_not_null(column),
            ClauseSpec::StatusEq(label) => query.where_eq("status", label.as_str()),
            ClauseSpec::StatusIn(labels) => query.where_in(
                "posts.status",
                labels.iter().map(String::as_str).collect(),
            ),
            ClauseSpec::StatusNotIn(labels) => query.where_not_in(
                "status",
                labels.iter().map(String::as_str).collect(),
            ),
            ClauseSpec::StatusNull => query.where_null("posts.status"),
        };
        if !spec.is_moderation() {
            kept.extend(query.where_bindings()[before..].iter().cloned());
        }
    }
    (query, kept)
}

fn apply(query: ModeratedQuery<Post>, modifier: Modifier) -> ModeratedQuery<Post> {
    let result = match modifier {
        Modifier::WithPending => query.with_pending(),
        Modifier::WithRejected => query.with_rejected(),
        Modifier::WithPostponed => query.with_postponed(),
        Modifier::WithAnyStatus => query.with_any_status(),
        Modifier::Pending => query.pending(),
        Modifier::Rejected => query.rejected(),
        Modifier::Postponed => query.postponed(),
    };
    result.unwrap()
}

fn visible(modifier: Modifier, status: ModerationStatus) -> bool {
    use ModerationStatus::*;
    match modifier {
        Modifier::WithPending => matches!(status, Approved | Pending),
        Modifier::WithRejected => matches!(status, Approved | Rejected),
        Modifier::WithPostponed => matches!(status, Approved | Postponed),
        Modifier::WithAnyStatus => true,
        Modifier::Pending => status == Pending,
        Modifier::Rejected => status == Rejected,
        Modifier::Postponed => status == Postponed,
    }
}

proptest! {
    /// Property: removal keeps every other clause and exactly its bindings, in order
    #[test]
    fn removal_preserves_foreign_clauses_and_bindings(specs in clauses_strategy()) {
        let (mut query, kept) = build(&specs);
        let expected_clauses: Vec<WhereClause> = query
            .wheres()
            .iter()
            .filter(|clause| !ModerationScope::is_moderation_constraint::<Post>(clause))
            .cloned()
            .collect();

        let removed = ModerationScope::remove::<Post>(&mut query).unwrap();

        prop_assert_eq!(removed, specs.iter().filter(|s| s.is_moderation()).count());
        prop_assert_eq!(query.wheres(), expected_clauses.as_slice());
        prop_assert_eq!(query.where_bindings(), kept.as_slice());
        prop_assert!(query.bound_wheres().is_some());
    }

    /// Property: removing twice changes nothing the second time
    #[test]
    fn removal_is_idempotent(specs in clauses_strategy()) {
        let (mut query, _) = build(&specs);
        ModerationScope::remove::<Post>(&mut query).unwrap();
        let once = query.clone();

        prop_assert_eq!(ModerationScope::remove::<Post>(&mut query).unwrap(), 0);
        prop_assert_eq!(query, once);
    }

    /// Property: after any chain of modifiers at most one status constraint remains
    #[test]
    fn modifier_chains_leave_one_constraint(
        specs in clauses_strategy(),
        modifiers in prop::collection::vec(modifier_strategy(), 1..6),
    ) {
        let (base, _) = build(&specs);
        let mut query = scope().scope::<Post>(base).unwrap();
        for modifier in &modifiers {
            query = apply(query, *modifier);
        }

        let constraints = query
            .query()
            .wheres()
            .iter()
            .filter(|clause| ModerationScope::is_moderation_constraint::<Post>(clause))
            .count();
        let expected = usize::from(modifiers.last() != Some(&Modifier::WithAnyStatus));
        prop_assert_eq!(constraints, expected);
    }

    /// Property: the last modifier alone decides which stored statuses are visible
    #[test]
    fn last_modifier_decides_visibility(
        statuses in prop::collection::vec(status_strategy(), 0..20),
        modifiers in prop::collection::vec(modifier_strategy(), 1..4),
    ) {
        let executor = MemoryExecutor::new();
        for (id, status) in statuses.iter().enumerate() {
            executor.insert(
                "posts",
                Record::new().with("id", id as i64).with("status", status.to_string()),
            );
        }

        let mut query = scope().query::<Post>();
        for modifier in &modifiers {
            query = apply(query, *modifier);
        }
        let last = *modifiers.last().unwrap();

        let count = tokio_test::block_on(query.count(&executor)).unwrap();
        let expected = statuses.iter().filter(|s| visible(last, **s)).count() as u64;
        prop_assert_eq!(count, expected);
    }

    /// Property: the default scope shows approved and pending rows only
    #[test]
    fn default_scope_shows_approved_and_pending(
        statuses in prop::collection::vec(status_strategy(), 0..20),
    ) {
        let executor = MemoryExecutor::new();
        for (id, status) in statuses.iter().enumerate() {
            executor.insert(
                "posts",
                Record::new().with("id", id as i64).with("status", status.to_string()),
            );
        }

        let count = tokio_test::block_on(scope().query::<Post>().count(&executor)).unwrap();
        let expected = statuses
            .iter()
            .filter(|s| s.is_visible_by_default())
            .count() as u64;
        prop_assert_eq!(count, expected);
    }
}
