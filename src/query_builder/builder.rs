use super::{BindValue, Join, Pagination, WhereClause};

/// A `column = value` pair in an UPDATE
pub type Assignment = (String, BindValue);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// What a logical delete does instead of removing rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteHook {
    /// Set the column to the current timestamp and keep the row
    Stamp { column: String },
}

/// Query builder with positional where-bindings
///
/// Where-clauses and where-bindings are kept as two parallel ordered lists:
/// clause `i` consumes `wheres[i].binding_count()` values starting right after
/// the values consumed by clauses `0..i`. Both lists support removal by index
/// so scopes can strip their own constraints without disturbing others.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    wheres: Vec<WhereClause>,
    where_bindings: Vec<BindValue>,
    order_by: Vec<OrderBy>,
    pagination: Pagination,
    delete_hook: Option<DeleteHook>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            wheres: Vec::new(),
            where_bindings: Vec::new(),
            order_by: Vec::new(),
            pagination: Pagination::default(),
            delete_hook: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    /// Append a clause and its bindings
    ///
    /// `values.len()` must equal `clause.binding_count()`.
    pub fn push_where(&mut self, clause: WhereClause, values: Vec<BindValue>) {
        debug_assert_eq!(clause.binding_count(), values.len());
        self.wheres.push(clause);
        self.where_bindings.extend(values);
    }

    /// Add a WHERE condition with an explicit operator
    pub fn where_op(mut self, column: &str, operator: &str, value: impl Into<BindValue>) -> Self {
        self.push_where(WhereClause::basic(column, operator), vec![value.into()]);
        self
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.where_op(column, "=", value)
    }

    /// Add WHERE IN condition
    pub fn where_in<V: Into<BindValue>>(mut self, column: &str, values: Vec<V>) -> Self {
        let values: Vec<BindValue> = values.into_iter().map(Into::into).collect();
        let clause = WhereClause::In {
            column: column.to_string(),
            count: values.len(),
        };
        self.push_where(clause, values);
        self
    }

    /// Add WHERE NOT IN condition
    pub fn where_not_in<V: Into<BindValue>>(mut self, column: &str, values: Vec<V>) -> Self {
        let values: Vec<BindValue> = values.into_iter().map(Into::into).collect();
        let clause = WhereClause::NotIn {
            column: column.to_string(),
            count: values.len(),
        };
        self.push_where(clause, values);
        self
    }

    /// Add WHERE IS NULL condition
    pub fn where_null(mut self, column: &str) -> Self {
        self.push_where(
            WhereClause::Null {
                column: column.to_string(),
            },
            Vec::new(),
        );
        self
    }

    /// Add WHERE IS NOT NULL condition
    pub fn where_not_null(mut self, column: &str) -> Self {
        self.push_where(
            WhereClause::NotNull {
                column: column.to_string(),
            },
            Vec::new(),
        );
        self
    }

    /// Add raw SQL with `?` placeholders bound to `values` in order
    ///
    /// The clause consumes one binding per `?` mark. A mark count that differs
    /// from `values.len()` panics in debug builds and otherwise leaves the
    /// query misaligned, which scope removal reports as
    /// [`InconsistentBinding`](crate::error::ModerationError::InconsistentBinding).
    pub fn where_raw(mut self, sql: &str, values: Vec<BindValue>) -> Self {
        let clause = WhereClause::raw(sql);
        debug_assert_eq!(
            clause.binding_count(),
            values.len(),
            "raw clause `{sql}` has a different number of `?` marks than values"
        );
        self.push_where(clause, values);
        self
    }

    pub fn wheres(&self) -> &[WhereClause] {
        &self.wheres
    }

    /// Remove the clause at `index`, shifting later clauses down
    ///
    /// Bindings are left alone; see [`QueryBuilder::remove_where_binding`].
    pub fn remove_where(&mut self, index: usize) -> Option<WhereClause> {
        (index < self.wheres.len()).then(|| self.wheres.remove(index))
    }

    pub fn where_bindings(&self) -> &[BindValue] {
        &self.where_bindings
    }

    /// Remove the where-binding at `position`, shifting later bindings down
    pub fn remove_where_binding(&mut self, position: usize) -> Option<BindValue> {
        (position < self.where_bindings.len()).then(|| self.where_bindings.remove(position))
    }

    /// Replace the where-binding group wholesale
    pub fn set_where_bindings(&mut self, bindings: Vec<BindValue>) {
        self.where_bindings = bindings;
    }

    /// Each clause paired with the bindings it consumes
    ///
    /// Returns `None` when the binding list is shorter than the clauses need.
    pub fn bound_wheres(&self) -> Option<Vec<(&WhereClause, &[BindValue])>> {
        let mut position = 0;
        let mut bound = Vec::with_capacity(self.wheres.len());
        for clause in &self.wheres {
            let end = position + clause.binding_count();
            bound.push((clause, self.where_bindings.get(position..end)?));
            position = end;
        }
        Some(bound)
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn order_asc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    pub fn orders(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// Add pagination from a 1-indexed page
    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Pagination::page(page, per_page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    pub fn without_pagination(mut self) -> Self {
        self.pagination = Pagination::default();
        self
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Register what a logical delete should do instead of removing rows
    pub fn on_delete(&mut self, hook: DeleteHook) {
        self.delete_hook = Some(hook);
    }

    pub fn delete_hook(&self) -> Option<&DeleteHook> {
        self.delete_hook.as_ref()
    }

    /// Build the SELECT statement
    pub fn build_sql(&self) -> String {
        let mut next = 1;
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_fields.join(", "),
            self.table
        );
        sql.push_str(&self.from_tail_sql(&mut next));
        sql
    }

    /// Build a COUNT(*) statement over the same constraints
    pub fn build_count_sql(&self) -> String {
        let mut next = 1;
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        sql.push_str(&self.joins_sql());
        sql.push_str(&self.where_sql(&mut next));
        sql
    }

    /// Build an UPDATE statement and the full parameter list
    ///
    /// Assignment values come first, then where-bindings. Joined or paginated
    /// queries update through a `ctid` subquery since PostgreSQL UPDATE has no
    /// JOIN or LIMIT.
    pub fn build_update_sql(&self, assignments: &[Assignment]) -> (String, Vec<BindValue>) {
        let mut next = 1;
        let set_clause = assignments
            .iter()
            .map(|(column, _)| {
                let p = format!("{column} = ${next}");
                next += 1;
                p
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {} SET {}", self.table, set_clause);
        sql.push_str(&self.mutation_filter_sql(&mut next));

        let mut params: Vec<BindValue> = assignments.iter().map(|(_, v)| v.clone()).collect();
        params.extend(self.where_bindings.iter().cloned());
        (sql, params)
    }

    /// Build a DELETE statement; parameters are the where-bindings
    pub fn build_delete_sql(&self) -> String {
        let mut next = 1;
        let mut sql = format!("DELETE FROM {}", self.table);
        sql.push_str(&self.mutation_filter_sql(&mut next));
        sql
    }

    /// SELECT with values inlined, for logging and debugging only
    pub fn to_debug_sql(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_fields.join(", "),
            self.table
        );
        sql.push_str(&self.joins_sql());
        if let Some(bound) = self.bound_wheres() {
            if !bound.is_empty() {
                let parts: Vec<String> = bound
                    .iter()
                    .map(|(clause, values)| clause.to_debug_sql(values))
                    .collect();
                sql.push_str(" WHERE ");
                sql.push_str(&parts.join(" AND "));
            }
        }
        sql.push_str(&self.order_sql());
        sql.push_str(&self.pagination.to_sql());
        sql
    }

    fn joins_sql(&self) -> String {
        self.joins
            .iter()
            .map(|join| format!(" {}", join.to_sql()))
            .collect()
    }

    fn where_sql(&self, next: &mut usize) -> String {
        if self.wheres.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.wheres.iter().map(|c| c.to_sql(next)).collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    fn order_sql(&self) -> String {
        if self.order_by.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .order_by
            .iter()
            .map(|o| format!("{} {}", o.column, o.direction.to_sql()))
            .collect();
        format!(" ORDER BY {}", parts.join(", "))
    }

    fn from_tail_sql(&self, next: &mut usize) -> String {
        let mut sql = self.joins_sql();
        sql.push_str(&self.where_sql(next));
        sql.push_str(&self.order_sql());
        sql.push_str(&self.pagination.to_sql());
        sql
    }

    fn mutation_filter_sql(&self, next: &mut usize) -> String {
        if self.joins.is_empty() && self.pagination.is_empty() {
            return self.where_sql(next);
        }
        format!(
            " WHERE ctid IN (SELECT {}.ctid FROM {}{})",
            self.table,
            self.table,
            self.from_tail_sql(next)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("posts")
            .select(&["id", "title", "status"])
            .where_eq("category", "news")
            .order_desc("created_at")
            .limit(10);

        assert_eq!(
            query.build_sql(),
            "SELECT id, title, status FROM posts WHERE category = $1 ORDER BY created_at DESC LIMIT 10"
        );
        assert_eq!(query.where_bindings(), &[BindValue::from("news")]);
    }

    #[test]
    fn test_placeholders_follow_binding_counts() {
        let query = QueryBuilder::new("posts")
            .where_in("status", vec!["approved", "pending"])
            .where_null("deleted_at")
            .where_op("views", ">", 10);

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts WHERE status IN ($1, $2) AND deleted_at IS NULL AND views > $3"
        );
        assert_eq!(query.where_bindings().len(), 3);
    }

    #[test]
    fn test_join_query_building() {
        let query = QueryBuilder::new("posts")
            .inner_join("users", "users.id = posts.user_id")
            .where_eq("users.name", "ada");

        let sql = query.build_sql();
        assert!(sql.contains("INNER JOIN users ON users.id = posts.user_id"));
        assert!(query.has_joins());
    }

    #[test]
    fn test_update_sql_numbers_assignments_before_wheres() {
        let query = QueryBuilder::new("posts").where_eq("category", "news");
        let (sql, params) = query.build_update_sql(&[
            ("status".to_string(), BindValue::from("rejected")),
            ("moderated_by".to_string(), BindValue::from(7)),
        ]);

        assert_eq!(
            sql,
            "UPDATE posts SET status = $1, moderated_by = $2 WHERE category = $3"
        );
        assert_eq!(
            params,
            vec![
                BindValue::from("rejected"),
                BindValue::from(7),
                BindValue::from("news")
            ]
        );
    }

    #[test]
    fn test_update_with_join_uses_ctid_subquery() {
        let query = QueryBuilder::new("posts")
            .inner_join("users", "users.id = posts.user_id")
            .where_eq("users.banned", true);
        let (sql, _) = query.build_update_sql(&[("status".to_string(), BindValue::from("rejected"))]);

        assert_eq!(
            sql,
            "UPDATE posts SET status = $1 WHERE ctid IN (SELECT posts.ctid FROM posts INNER JOIN users ON users.id = posts.user_id WHERE users.banned = $2)"
        );
    }

    #[test]
    fn test_delete_sql() {
        let query = QueryBuilder::new("posts").where_eq("id", 3);
        assert_eq!(query.build_delete_sql(), "DELETE FROM posts WHERE id = $1");
    }

    #[test]
    fn test_remove_where_and_binding_out_of_range() {
        let mut query = QueryBuilder::new("posts").where_eq("id", 1);
        assert!(query.remove_where(5).is_none());
        assert!(query.remove_where_binding(1).is_none());
        assert_eq!(query.remove_where_binding(0), Some(BindValue::from(1)));
    }

    #[test]
    fn test_bound_wheres_detects_short_bindings() {
        let mut query = QueryBuilder::new("posts").where_eq("a", 1).where_eq("b", 2);
        assert_eq!(query.bound_wheres().map(|b| b.len()), Some(2));
        query.set_where_bindings(vec![BindValue::from(1)]);
        assert!(query.bound_wheres().is_none());
    }

    #[test]
    fn test_raw_clause_numbers_placeholders_without_gaps() {
        let query = QueryBuilder::new("posts")
            .where_raw("views BETWEEN ? AND ?", vec![1.into(), 9.into()])
            .where_eq("category", "news");

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts WHERE views BETWEEN $1 AND $2 AND category = $3"
        );
        assert!(query.bound_wheres().is_some());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different number of `?` marks")]
    fn test_raw_clause_rejects_mismatched_values() {
        let _ = QueryBuilder::new("posts").where_raw("views > ?", vec![1.into(), 2.into()]);
    }

    #[test]
    fn test_debug_sql() {
        let query = QueryBuilder::new("posts")
            .where_eq("category", "x")
            .where_op("views", ">", 10);
        assert_eq!(
            query.to_debug_sql(),
            "SELECT * FROM posts WHERE category = 'x' AND views > 10"
        );
    }
}
