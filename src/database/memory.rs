//! In-memory executor for tests and embedders without a database.
//!
//! Evaluates where-clauses against stored rows with SQL comparison semantics
//! (NULL matches nothing). Joins and raw SQL clauses cannot be evaluated and
//! are rejected with [`ModerationError::Unsupported`].

use super::QueryExecutor;
use crate::error::{ModerationError, Result};
use crate::models::Record;
use crate::query_builder::{Assignment, BindValue, QueryBuilder, SortDirection, WhereClause};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: &str, record: Record) {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    /// Snapshot of every row in a table, in insertion order
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    /// Indices of the rows matched by `query`, after ordering and pagination
    fn matching_indices(&self, rows: &[Record], query: &QueryBuilder) -> Result<Vec<usize>> {
        if query.has_joins() {
            return Err(ModerationError::unsupported(
                "memory query",
                "joins cannot be evaluated in memory",
            ));
        }

        let bound = query
            .bound_wheres()
            .ok_or_else(|| ModerationError::InconsistentBinding {
                position: query.wheres().iter().map(WhereClause::binding_count).sum(),
                available: query.where_bindings().len(),
            })?;

        let mut indices = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let mut matched = true;
            for (clause, values) in &bound {
                if !clause_matches(query.table(), row, clause, values)? {
                    matched = false;
                    break;
                }
            }
            if matched {
                indices.push(index);
            }
        }

        if !query.orders().is_empty() {
            let mut keys = Vec::with_capacity(query.orders().len());
            for order in query.orders() {
                keys.push((local_column(query.table(), &order.column)?, order.direction));
            }
            indices.sort_by(|a, b| {
                keys.iter()
                    .map(|(column, direction)| {
                        let ordering = rows[*a].value(column).sort_cmp(rows[*b].value(column));
                        match direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        Ok(query.pagination().apply(indices))
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>> {
        let tables = self.tables.read();
        let rows = tables.get(query.table()).map(Vec::as_slice).unwrap_or(&[]);
        let indices = self.matching_indices(rows, query)?;
        Ok(indices
            .into_iter()
            .map(|i| rows[i].project(query.select_fields()))
            .collect())
    }

    async fn count(&self, query: &QueryBuilder) -> Result<u64> {
        let unpaginated = query.clone().without_pagination();
        let tables = self.tables.read();
        let rows = tables.get(query.table()).map(Vec::as_slice).unwrap_or(&[]);
        Ok(self.matching_indices(rows, &unpaginated)?.len() as u64)
    }

    async fn update(&self, query: &QueryBuilder, assignments: &[Assignment]) -> Result<u64> {
        let mut columns = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            columns.push((local_column(query.table(), column)?, value));
        }

        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(query.table()) else {
            return Ok(0);
        };
        let indices = self.matching_indices(rows, query)?;
        for index in &indices {
            for (column, value) in &columns {
                rows[*index].set(column, (*value).clone());
            }
        }
        Ok(indices.len() as u64)
    }

    async fn delete(&self, query: &QueryBuilder) -> Result<u64> {
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(query.table()) else {
            return Ok(0);
        };
        let mut indices = self.matching_indices(rows, query)?;
        indices.sort_unstable();
        for index in indices.iter().rev() {
            rows.remove(*index);
        }
        Ok(indices.len() as u64)
    }

    async fn save(
        &self,
        table: &str,
        key_column: &str,
        key: &BindValue,
        changes: &[Assignment],
    ) -> Result<bool> {
        let mut tables = self.tables.write();
        let Some(row) = tables.get_mut(table).and_then(|rows| {
            rows.iter_mut()
                .find(|row| row.value(key_column).sql_cmp(key) == Some(Ordering::Equal))
        }) else {
            return Ok(false);
        };
        for (column, value) in changes {
            row.set(column, value.clone());
        }
        Ok(true)
    }
}

/// Strip this table's qualifier; columns of other tables cannot be resolved
fn local_column<'a>(table: &str, column: &'a str) -> Result<&'a str> {
    match column.split_once('.') {
        None => Ok(column),
        Some((qualifier, name)) if qualifier == table => Ok(name),
        Some(_) => Err(ModerationError::unsupported(
            "memory query",
            format!("column {column} does not belong to {table}"),
        )),
    }
}

fn clause_matches(
    table: &str,
    row: &Record,
    clause: &WhereClause,
    values: &[BindValue],
) -> Result<bool> {
    match clause {
        WhereClause::Basic { column, operator } => {
            let actual = row.value(local_column(table, column)?);
            let ordering = values.first().and_then(|expected| actual.sql_cmp(expected));
            let Some(ordering) = ordering else {
                return Ok(false);
            };
            match operator.as_str() {
                "=" => Ok(ordering == Ordering::Equal),
                "!=" | "<>" => Ok(ordering != Ordering::Equal),
                "<" => Ok(ordering == Ordering::Less),
                "<=" => Ok(ordering != Ordering::Greater),
                ">" => Ok(ordering == Ordering::Greater),
                ">=" => Ok(ordering != Ordering::Less),
                other => Err(ModerationError::unsupported(
                    "memory query",
                    format!("operator {other} is not supported"),
                )),
            }
        }
        WhereClause::In { column, .. } => {
            let actual = row.value(local_column(table, column)?);
            Ok(values
                .iter()
                .any(|v| actual.sql_cmp(v) == Some(Ordering::Equal)))
        }
        WhereClause::NotIn { column, .. } => {
            let actual = row.value(local_column(table, column)?);
            if actual.is_null() {
                return Ok(false);
            }
            Ok(values
                .iter()
                .all(|v| actual.sql_cmp(v).is_some_and(|o| o != Ordering::Equal)))
        }
        WhereClause::Null { column } => Ok(row.value(local_column(table, column)?).is_null()),
        WhereClause::NotNull { column } => {
            Ok(!row.value(local_column(table, column)?).is_null())
        }
        WhereClause::Raw { .. } => Err(ModerationError::unsupported(
            "memory query",
            "raw SQL clauses cannot be evaluated in memory",
        )),
    }
}
