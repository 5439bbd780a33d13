use super::BindValue;

/// A single WHERE clause
///
/// Clauses never hold their values; those live in the builder's where-binding
/// list in clause order. [`WhereClause::binding_count`] says how many
/// consecutive bindings each clause consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    Basic { column: String, operator: String },
    In { column: String, count: usize },
    NotIn { column: String, count: usize },
    Null { column: String },
    NotNull { column: String },
    /// Raw SQL with `?` placeholders
    Raw { sql: String, count: usize },
}

impl WhereClause {
    pub fn basic(column: impl Into<String>, operator: impl Into<String>) -> Self {
        Self::Basic {
            column: column.into(),
            operator: operator.into(),
        }
    }

    /// Raw SQL clause binding one value per `?` mark
    ///
    /// Every `?` is a placeholder; raw SQL cannot use `?` for anything else.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let count = sql.matches('?').count();
        Self::Raw { sql, count }
    }

    /// Column constrained by this clause; raw clauses have none
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Basic { column, .. }
            | Self::In { column, .. }
            | Self::NotIn { column, .. }
            | Self::Null { column }
            | Self::NotNull { column } => Some(column),
            Self::Raw { .. } => None,
        }
    }

    /// Number of where-bindings this clause consumes
    pub fn binding_count(&self) -> usize {
        match self {
            Self::Basic { .. } => 1,
            Self::In { count, .. } | Self::NotIn { count, .. } | Self::Raw { count, .. } => *count,
            // null checks carry no parameter
            Self::Null { .. } | Self::NotNull { .. } => 0,
        }
    }

    /// Render with `$n` placeholders, advancing `next_placeholder`
    pub fn to_sql(&self, next_placeholder: &mut usize) -> String {
        let mut placeholders = |count: usize| -> Vec<String> {
            (0..count)
                .map(|_| {
                    let p = format!("${}", *next_placeholder);
                    *next_placeholder += 1;
                    p
                })
                .collect()
        };

        match self {
            Self::Basic { column, operator } => {
                format!("{column} {operator} {}", placeholders(1).join(""))
            }
            Self::In { column, count } => membership_sql(column, "IN", &placeholders(*count)),
            Self::NotIn { column, count } => {
                membership_sql(column, "NOT IN", &placeholders(*count))
            }
            Self::Null { column } => format!("{column} IS NULL"),
            Self::NotNull { column } => format!("{column} IS NOT NULL"),
            Self::Raw { sql, count } => {
                let numbered = placeholders(*count);
                substitute_marks(sql, numbered.iter().map(String::as_str))
            }
        }
    }

    /// Render with values inlined, for logging and debugging only
    pub fn to_debug_sql(&self, values: &[BindValue]) -> String {
        let literals: Vec<String> = values.iter().map(BindValue::to_sql_literal).collect();
        match self {
            Self::Basic { column, operator } => format!(
                "{column} {operator} {}",
                literals.first().map(String::as_str).unwrap_or("?")
            ),
            Self::In { column, .. } => membership_sql(column, "IN", &literals),
            Self::NotIn { column, .. } => membership_sql(column, "NOT IN", &literals),
            Self::Null { column } => format!("{column} IS NULL"),
            Self::NotNull { column } => format!("{column} IS NOT NULL"),
            Self::Raw { sql, .. } => substitute_marks(sql, literals.iter().map(String::as_str)),
        }
    }
}

/// Replace each `?` with the next replacement; marks past the end stay as they are
fn substitute_marks<'a>(sql: &str, replacements: impl IntoIterator<Item = &'a str>) -> String {
    let mut replacements = replacements.into_iter();
    let mut rendered = String::with_capacity(sql.len());
    for ch in sql.chars() {
        let replacement = if ch == '?' { replacements.next() } else { None };
        match replacement {
            Some(replacement) => rendered.push_str(replacement),
            None => rendered.push(ch),
        }
    }
    rendered
}

/// `IN ()` is invalid SQL; an empty list matches nothing (or everything for NOT IN)
fn membership_sql(column: &str, operator: &str, items: &[String]) -> String {
    if items.is_empty() {
        return if operator == "IN" { "1 = 0" } else { "1 = 1" }.to_string();
    }
    format!("{column} {operator} ({})", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_clause_placeholders() {
        let mut next = 3;
        let clause = WhereClause::basic("posts.status", "=");
        assert_eq!(clause.to_sql(&mut next), "posts.status = $3");
        assert_eq!(next, 4);
    }

    #[test]
    fn test_in_clause_consumes_one_placeholder_per_member() {
        let mut next = 1;
        let clause = WhereClause::In {
            column: "status".to_string(),
            count: 2,
        };
        assert_eq!(clause.to_sql(&mut next), "status IN ($1, $2)");
        assert_eq!(clause.binding_count(), 2);
        assert_eq!(next, 3);
    }

    #[test]
    fn test_null_checks_bind_nothing() {
        let mut next = 1;
        let clause = WhereClause::NotNull {
            column: "moderated_at".to_string(),
        };
        assert_eq!(clause.to_sql(&mut next), "moderated_at IS NOT NULL");
        assert_eq!(clause.binding_count(), 0);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_raw_clause_replaces_question_marks() {
        let mut next = 2;
        let clause = WhereClause::Raw {
            sql: "views BETWEEN ? AND ?".to_string(),
            count: 2,
        };
        assert_eq!(clause.to_sql(&mut next), "views BETWEEN $2 AND $3");
        assert_eq!(clause.column(), None);
    }

    #[test]
    fn test_raw_constructor_counts_marks() {
        let clause = WhereClause::raw("lower(title) LIKE ? OR views > ?");
        assert_eq!(clause.binding_count(), 2);

        let mut next = 1;
        assert_eq!(clause.to_sql(&mut next), "lower(title) LIKE $1 OR views > $2");
        assert_eq!(next, 3);
        assert_eq!(WhereClause::raw("archived").binding_count(), 0);
    }

    #[test]
    fn test_not_in_consumes_one_placeholder_per_member() {
        let mut next = 4;
        let clause = WhereClause::NotIn {
            column: "category".to_string(),
            count: 3,
        };
        assert_eq!(clause.to_sql(&mut next), "category NOT IN ($4, $5, $6)");
        assert_eq!(clause.binding_count(), 3);
    }

    #[test]
    fn test_empty_membership() {
        let mut next = 1;
        let clause = WhereClause::In {
            column: "status".to_string(),
            count: 0,
        };
        assert_eq!(clause.to_sql(&mut next), "1 = 0");
    }

    #[test]
    fn test_debug_sql_inlines_values() {
        let clause = WhereClause::In {
            column: "status".to_string(),
            count: 2,
        };
        let values = vec![BindValue::from("approved"), BindValue::from("pending")];
        assert_eq!(
            clause.to_debug_sql(&values),
            "status IN ('approved', 'pending')"
        );
    }
}
