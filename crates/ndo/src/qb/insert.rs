//! INSERT builder (single row or batch).

use crate::case;
use crate::error::{NdoError, NdoResult};
use crate::qb::statement::Statement;
use crate::value::{FieldValue, Fields, Value};

/// INSERT builder.
///
/// Columns come from the keys of the first row, snake_cased. Bound values
/// render as `?`; function values render literally and bind nothing. Later
/// rows are rendered in the first row's column order: a missing key binds
/// NULL and extra keys are ignored.
#[derive(Clone, Debug, Default)]
pub struct InsertQb {
    table: String,
    rows: Vec<Fields>,
}

impl InsertQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows: Vec::new(),
        }
    }

    /// Set a column on the current (single) row.
    pub fn set(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.current_row().insert(key, value.into());
        self
    }

    /// Set a column to a SQL function call on the current row, e.g. `NOW()`.
    pub fn call(mut self, key: &str, function: &str) -> Self {
        self.current_row().insert(key, FieldValue::function(function));
        self
    }

    /// Append a row.
    pub fn row(mut self, fields: Fields) -> Self {
        self.rows.push(fields);
        self
    }

    /// Append several rows (batch insert).
    pub fn rows(mut self, rows: impl IntoIterator<Item = Fields>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Values descriptor: one JSON object, or an array of objects for a batch.
    pub fn values_json(self, values: &serde_json::Value) -> Self {
        match values {
            serde_json::Value::Array(items) => self.rows(items.iter().map(Fields::from_json)),
            single => self.row(Fields::from_json(single)),
        }
    }

    fn current_row(&mut self) -> &mut Fields {
        if self.rows.is_empty() {
            self.rows.push(Fields::new());
        }
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Build the INSERT statement.
    ///
    /// Fails with [`NdoError::InvalidTable`] for a blank table name. Without
    /// any column the empty statement is returned.
    pub fn build(&self) -> NdoResult<Statement> {
        let table = self.table.trim();
        if table.is_empty() {
            return Err(NdoError::InvalidTable(self.table.clone()));
        }

        let Some(first) = self.rows.first().filter(|r| !r.is_empty()) else {
            return Ok(Statement::empty());
        };

        let keys: Vec<&str> = first.iter().map(|(k, _)| k).collect();
        let columns: Vec<String> = keys.iter().map(|k| case::snake(k)).collect();

        let mut values = Vec::new();
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let items: Vec<String> = keys
                    .iter()
                    .map(|key| match row.get(key) {
                        Some(FieldValue::Bind(v)) => {
                            values.push(v.clone());
                            "?".to_string()
                        }
                        Some(f @ FieldValue::Function { .. }) => f.call_sql().unwrap_or_default(),
                        None => {
                            values.push(Value::Null);
                            "?".to_string()
                        }
                    })
                    .collect();
                format!("({})", items.join(", "))
            })
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            columns.join(", "),
            tuples.join(", ")
        );
        Ok(Statement::new(sql, values).with_table(table))
    }

    /// Get the built SQL string (for debugging). Empty on error.
    pub fn to_sql(&self) -> String {
        self.build().map(|s| s.sql).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_row() {
        let stmt = InsertQb::new("users")
            .set("firstName", "Ada")
            .set("age", 36)
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (first_name, age) VALUES (?, ?)");
        assert_eq!(stmt.values, vec![Value::from("Ada"), Value::Int(36)]);
        assert_eq!(stmt.table.as_deref(), Some("users"));
    }

    #[test]
    fn test_function_value_is_not_bound() {
        let stmt = InsertQb::new("users")
            .call("createdAt", "NOW")
            .set("name", "x")
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (created_at, name) VALUES (NOW(), ?)");
        assert_eq!(stmt.placeholder_count(), 1);
        assert_eq!(stmt.values.len(), 1);
    }

    #[test]
    fn test_batch_rows() {
        let stmt = InsertQb::new("tags")
            .rows([
                Fields::new().set("name", "a").call("createdAt", "NOW"),
                Fields::new().set("name", "b").call("createdAt", "NOW"),
            ])
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO tags (name, created_at) VALUES (?, NOW()), (?, NOW())"
        );
        assert_eq!(stmt.values, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_batch_missing_key_binds_null() {
        let stmt = InsertQb::new("t")
            .row(Fields::new().set("a", 1).set("b", 2))
            .row(Fields::new().set("a", 3))
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t (a, b) VALUES (?, ?), (?, ?)");
        assert_eq!(stmt.values, vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_invalid_table() {
        let err = InsertQb::new("  ").set("a", 1).build().unwrap_err();
        assert!(err.is_invalid_table());
    }

    #[test]
    fn test_no_values_is_empty() {
        let stmt = InsertQb::new("t").build().unwrap();
        assert!(stmt.is_empty());
    }

    #[test]
    fn test_values_json() {
        let stmt = InsertQb::new("events")
            .values_json(&json!({"kind": "login", "at": {"function": "NOW"}}))
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO events (kind, at) VALUES (?, NOW())");
        assert_eq!(stmt.values, vec![Value::from("login")]);
    }
}
