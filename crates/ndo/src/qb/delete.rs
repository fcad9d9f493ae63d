//! DELETE builder.

use crate::error::NdoResult;
use crate::qb::cond::Where;
use crate::qb::statement::Statement;

/// DELETE builder.
///
/// There is no way to build an unconditional DELETE: an empty condition tree
/// yields the empty statement.
#[derive(Clone, Debug, Default)]
pub struct DeleteQb {
    table: String,
    conds: Where,
}

impl DeleteQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conds: Where::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn build(&self) -> NdoResult<Statement> {
        self.conds.validate()?;
        let mut values = Vec::new();
        let where_sql = self.conds.render(&mut values);
        if where_sql.is_empty() {
            return Ok(Statement::empty());
        }
        Ok(Statement::new(
            format!("DELETE FROM {} WHERE {}", self.table, where_sql),
            values,
        ))
    }

    /// Get the built SQL string (for debugging). Empty on error.
    pub fn to_sql(&self) -> String {
        self.build().map(|s| s.sql).unwrap_or_default()
    }
}

impl_where_methods!(DeleteQb);
