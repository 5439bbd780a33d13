use crate::query_builder::BindValue;
use serde::Serialize;
use std::collections::BTreeMap;

static NULL: BindValue = BindValue::Null;

/// A loaded row: column name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    columns: BTreeMap<String, BindValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, column: &str, value: impl Into<BindValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<BindValue>) {
        self.columns.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&BindValue> {
        self.columns.get(column)
    }

    /// Value of a column, treating missing columns as NULL
    pub fn value(&self, column: &str) -> &BindValue {
        self.columns.get(column).unwrap_or(&NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindValue)> {
        self.columns.iter()
    }

    /// Keep only the named columns
    pub fn project(&self, fields: &[String]) -> Record {
        if fields.iter().any(|f| f == "*") {
            return self.clone();
        }
        Record {
            columns: self
                .columns
                .iter()
                .filter(|(column, _)| fields.contains(column))
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<BindValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            columns: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_read_as_null() {
        let record = Record::new().with("id", 1);
        assert_eq!(record.value("id"), &BindValue::Int(1));
        assert!(record.value("moderated_by").is_null());
        assert!(record.get("moderated_by").is_none());
    }

    #[test]
    fn test_projection() {
        let record = Record::new().with("id", 1).with("status", "pending").with("title", "hi");
        let projected = record.project(&["id".to_string(), "status".to_string()]);
        assert_eq!(projected.iter().count(), 2);
        assert_eq!(record.project(&["*".to_string()]), record);
    }

    #[test]
    fn test_json_view() {
        let record = Record::new().with("id", 4).with("status", "approved");
        assert_eq!(
            record.to_json(),
            serde_json::json!({"id": 4, "status": "approved"})
        );
    }
}
