//! SELECT builder.

use crate::case;
use crate::error::NdoResult;
use crate::qb::cond::Where;
use crate::qb::join::Join;
use crate::qb::split_alias;
use crate::qb::statement::Statement;
use std::fmt;

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Parse `asc` / `desc` in any case; anything else is ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Placement of NULLs in ORDER BY terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl fmt::Display for NullsOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NullsOrder::First => f.write_str("NULLS FIRST"),
            NullsOrder::Last => f.write_str("NULLS LAST"),
        }
    }
}

/// One ORDER BY term.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// SELECT builder.
#[derive(Clone, Debug, Default)]
pub struct FindQb {
    /// `table` or `table|alias`
    table: String,
    /// Projection; empty means `*`
    fields: Vec<String>,
    joins: Vec<Join>,
    conds: Where,
    group_by: Vec<String>,
    order: Vec<OrderBy>,
    nulls: Option<NullsOrder>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl FindQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    // ==================== Projection ====================

    /// Project the given fields.
    ///
    /// Each entry is `field`, `table.field` or `field|alias`. Bare fields are
    /// aliased to their camelCase form, qualified fields to the part after the
    /// last `.`. `*` (alone) selects everything.
    pub fn fields<S: AsRef<str>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .filter(|f| f != "*")
            .collect();
        self
    }

    /// Add one projected field.
    pub fn field(mut self, field: &str) -> Self {
        self.fields.push(field.to_string());
        self
    }

    // ==================== JOIN ====================

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.joins.extend(joins);
        self
    }

    // ==================== GROUP / ORDER / LIMIT ====================

    pub fn group_by<S: AsRef<str>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.group_by
            .extend(fields.into_iter().map(|f| f.as_ref().to_string()));
        self
    }

    /// Add an ascending ORDER BY term.
    pub fn order_by(self, field: &str) -> Self {
        self.order(field, Direction::Asc)
    }

    /// Add a descending ORDER BY term.
    pub fn order_by_desc(self, field: &str) -> Self {
        self.order(field, Direction::Desc)
    }

    pub fn order(mut self, field: &str, direction: Direction) -> Self {
        self.order.push(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Place NULLs first or last in every ORDER BY term.
    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Apply `nulls` unless the builder already chose a NULL ordering.
    pub fn default_nulls(mut self, nulls: Option<NullsOrder>) -> Self {
        if self.nulls.is_none() {
            self.nulls = nulls;
        }
        self
    }

    /// Set LIMIT. Zero means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    // ==================== Descriptor form ====================

    /// Ordering descriptor: an array of field names (ascending) or an object
    /// mapping field to direction.
    pub fn order_json(mut self, order: &serde_json::Value) -> Self {
        match order {
            serde_json::Value::Array(fields) => {
                for field in fields.iter().filter_map(|f| f.as_str()) {
                    self = self.order(field, Direction::Asc);
                }
            }
            serde_json::Value::Object(map) => {
                for (field, dir) in map {
                    self = self.order(field, Direction::parse(dir.as_str().unwrap_or("ASC")));
                }
            }
            _ => {}
        }
        self
    }

    /// Join descriptor: see [`Join::list_from_json`].
    pub fn joins_json(self, joins: &serde_json::Value) -> Self {
        self.joins(Join::list_from_json(joins))
    }

    // ==================== Build ====================

    pub fn table(&self) -> &str {
        split_alias(&self.table).0
    }

    fn projection(&self) -> String {
        if self.fields.is_empty() {
            return "*".to_string();
        }
        self.fields
            .iter()
            .map(|entry| {
                let (field, alias) = match entry.split_once('|') {
                    Some((field, alias)) => (field.trim(), alias.trim().to_string()),
                    None => match entry.rsplit_once('.') {
                        Some((_, last)) => (entry.as_str(), last.to_string()),
                        None => (entry.as_str(), case::camel(entry)),
                    },
                };
                format!("{} as \"{}\"", field, alias)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build the SELECT statement and its values.
    ///
    /// Fails when a condition's placeholders do not match its values.
    pub fn build(&self) -> NdoResult<Statement> {
        self.conds.validate()?;
        let mut values = Vec::new();
        let (table, alias) = split_alias(&self.table);

        let mut sql = format!("SELECT {} FROM {} as {}", self.projection(), table, alias);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        let where_sql = self.conds.render(&mut values);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|o| match self.nulls {
                    Some(nulls) => format!("{} {} {}", o.field, o.direction, nulls),
                    None => format!("{} {}", o.field, o.direction),
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok(Statement::new(sql, values))
    }

    /// Get the built SQL string (for debugging). Empty on error.
    pub fn to_sql(&self) -> String {
        self.build().map(|s| s.sql).unwrap_or_default()
    }
}

impl_where_methods!(FindQb);
