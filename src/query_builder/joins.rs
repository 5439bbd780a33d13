/// Represents different types of SQL JOINs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause
///
/// ON conditions are plain SQL and bind no parameters, so joins never shift
/// where-binding positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: Option<String>,
}

impl Join {
    pub fn inner(table: impl Into<String>, on_condition: impl Into<String>) -> Self {
        Self::with_condition(JoinType::Inner, table, on_condition)
    }

    pub fn left(table: impl Into<String>, on_condition: impl Into<String>) -> Self {
        Self::with_condition(JoinType::Left, table, on_condition)
    }

    pub fn right(table: impl Into<String>, on_condition: impl Into<String>) -> Self {
        Self::with_condition(JoinType::Right, table, on_condition)
    }

    pub fn cross(table: impl Into<String>) -> Self {
        Self {
            join_type: JoinType::Cross,
            table: table.into(),
            on_condition: None,
        }
    }

    fn with_condition(
        join_type: JoinType,
        table: impl Into<String>,
        on_condition: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            on_condition: Some(on_condition.into()),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        match self.on_condition {
            Some(ref condition) => {
                format!("{} {} ON {}", self.join_type.to_sql(), self.table, condition)
            }
            None => format!("{} {}", self.join_type.to_sql(), self.table),
        }
    }
}
