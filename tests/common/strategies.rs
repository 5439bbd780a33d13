use moderation_core::ModerationStatus;
use proptest::prelude::*;
use proptest::strategy::Just;

/// A where-clause to add to a query, moderation constraints included
#[derive(Debug, Clone)]
pub enum ClauseSpec {
    Eq(String, i64),
    In(String, Vec<i64>),
    NotIn(String, Vec<i64>),
    /// SQL with one `?` per value
    Raw(String, Vec<i64>),
    Null(String),
    NotNull(String),
    StatusEq(String),
    StatusIn(Vec<String>),
    StatusNotIn(Vec<String>),
    StatusNull,
}

impl ClauseSpec {
    pub fn is_moderation(&self) -> bool {
        matches!(
            self,
            ClauseSpec::StatusEq(_)
                | ClauseSpec::StatusIn(_)
                | ClauseSpec::StatusNotIn(_)
                | ClauseSpec::StatusNull
        )
    }
}

/// Which visibility modifier to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    WithPending,
    WithRejected,
    WithPostponed,
    WithAnyStatus,
    Pending,
    Rejected,
    Postponed,
}

pub fn column_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("category".to_string()),
        Just("author_id".to_string()),
        Just("posts.views".to_string()),
        Just("deleted_at".to_string()),
    ]
}

pub fn status_strategy() -> impl Strategy<Value = ModerationStatus> {
    prop::sample::select(ModerationStatus::ALL.to_vec())
}

pub fn status_label_strategy() -> impl Strategy<Value = String> {
    status_strategy().prop_map(|status| status.to_string())
}

/// Raw SQL fragments with as many `?` marks as values
pub fn raw_clause_strategy() -> impl Strategy<Value = (String, Vec<i64>)> {
    prop::collection::vec(any::<i64>(), 0..4).prop_map(|values| {
        let sql = if values.is_empty() {
            "views IS NOT NULL".to_string()
        } else {
            let terms: Vec<&str> = values.iter().map(|_| "views > ?").collect();
            format!("({})", terms.join(" OR "))
        };
        (sql, values)
    })
}

pub fn clause_strategy() -> impl Strategy<Value = ClauseSpec> {
    prop_oneof![
        (column_strategy(), any::<i64>()).prop_map(|(c, v)| ClauseSpec::Eq(c, v)),
        (column_strategy(), prop::collection::vec(any::<i64>(), 0..4))
            .prop_map(|(c, v)| ClauseSpec::In(c, v)),
        (column_strategy(), prop::collection::vec(any::<i64>(), 0..4))
            .prop_map(|(c, v)| ClauseSpec::NotIn(c, v)),
        raw_clause_strategy().prop_map(|(sql, v)| ClauseSpec::Raw(sql, v)),
        column_strategy().prop_map(ClauseSpec::Null),
        column_strategy().prop_map(ClauseSpec::NotNull),
        status_label_strategy().prop_map(ClauseSpec::StatusEq),
        prop::collection::vec(status_label_strategy(), 1..4).prop_map(ClauseSpec::StatusIn),
        prop::collection::vec(status_label_strategy(), 1..4).prop_map(ClauseSpec::StatusNotIn),
        Just(ClauseSpec::StatusNull),
    ]
}

pub fn clauses_strategy() -> impl Strategy<Value = Vec<ClauseSpec>> {
    prop::collection::vec(clause_strategy(), 0..10)
}

pub fn modifier_strategy() -> impl Strategy<Value = Modifier> {
    prop_oneof![
        Just(Modifier::WithPending),
        Just(Modifier::WithRejected),
        Just(Modifier::WithPostponed),
        Just(Modifier::WithAnyStatus),
        Just(Modifier::Pending),
        Just(Modifier::Rejected),
        Just(Modifier::Postponed),
    ]
}
