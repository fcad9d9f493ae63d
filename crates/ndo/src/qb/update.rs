//! UPDATE builder.

use crate::case;
use crate::error::NdoResult;
use crate::qb::cond::Where;
use crate::qb::statement::Statement;
use crate::value::{FieldValue, Fields};

/// UPDATE builder. Without any SET column it builds the empty statement.
#[derive(Clone, Debug, Default)]
pub struct UpdateQb {
    table: String,
    fields: Fields,
    conds: Where,
}

impl UpdateQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// SET column = value
    pub fn set(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    /// SET column = function()
    pub fn call(mut self, key: &str, function: &str) -> Self {
        self.fields.insert(key, FieldValue::function(function));
        self
    }

    /// Merge a set of assignments.
    pub fn fields(mut self, fields: Fields) -> Self {
        for (key, value) in fields.iter() {
            self.fields.insert(key, value.clone());
        }
        self
    }

    /// Assignments in JSON descriptor form.
    pub fn values_json(self, values: &serde_json::Value) -> Self {
        self.fields(Fields::from_json(values))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn build(&self) -> NdoResult<Statement> {
        self.conds.validate()?;
        if self.fields.is_empty() {
            return Ok(Statement::empty());
        }

        let mut values = Vec::new();
        let assignments: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| match value {
                FieldValue::Bind(v) => {
                    values.push(v.clone());
                    format!("{} = ?", case::snake(key))
                }
                f @ FieldValue::Function { .. } => {
                    format!("{} = {}", case::snake(key), f.call_sql().unwrap_or_default())
                }
            })
            .collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));

        let where_sql = self.conds.render(&mut values);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        Ok(Statement::new(sql, values))
    }

    /// Get the built SQL string (for debugging). Empty on error.
    pub fn to_sql(&self) -> String {
        self.build().map(|s| s.sql).unwrap_or_default()
    }
}

impl_where_methods!(UpdateQb);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_update_with_where() {
        let stmt = UpdateQb::new("users")
            .set("lastName", "Byron")
            .call("updatedAt", "NOW")
            .eq("id", 7)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE users SET last_name = ?, updated_at = NOW() WHERE (id = ?)"
        );
        assert_eq!(stmt.values, vec![Value::from("Byron"), Value::Int(7)]);
    }

    #[test]
    fn test_update_without_where() {
        let stmt = UpdateQb::new("flags").set("enabled", false).build().unwrap();
        assert_eq!(stmt.sql, "UPDATE flags SET enabled = ?");
    }

    #[test]
    fn test_update_without_fields_is_empty() {
        assert!(UpdateQb::new("users").eq("id", 1).build().unwrap().is_empty());
    }

    #[test]
    fn test_set_values_precede_where_values() {
        let stmt = UpdateQb::new("t")
            .eq("id", 1)
            .set("a", 2)
            .set("b", 3)
            .build()
            .unwrap();
        assert_eq!(stmt.values, vec![Value::Int(2), Value::Int(3), Value::Int(1)]);
        assert_eq!(stmt.placeholder_count(), stmt.values.len());
    }
}
