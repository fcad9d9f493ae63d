//! Condition tree for WHERE clauses.
//!
//! A [`Where`] is a list of connective groups, each a flat list of [`Cond`]
//! leaves. Every group renders as one parenthesized boolean expression:
//!
//! ```text
//! (status = ? AND age > ?) AND (role = ? OR role = ?)
//! ```
//!
//! Rendering appends bound values to the caller's buffer in exactly the order
//! the `?` placeholders are emitted, so the buffer can be handed to a driver
//! unchanged. There is no nesting beyond one level.

use crate::case;
use crate::error::{NdoError, NdoResult};
use crate::value::Value;
use std::fmt;

/// Boolean connective joining the conditions of one group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// Parse `and` / `or` in any case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("and") {
            Some(Connective::And)
        } else if s.eq_ignore_ascii_case("or") {
            Some(Connective::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One leaf of the condition tree.
///
/// Field names are snake_cased on render unless they contain a `.`, in which
/// case they are treated as already qualified and emitted as written.
#[derive(Clone, Debug, PartialEq)]
pub enum Cond {
    /// `field = ?`
    Eq { field: String, value: Value },

    /// `field <op> ?`, binding one value.
    ///
    /// An operator that carries its own placeholders (e.g. `BETWEEN ? AND ?`)
    /// is emitted as written and binds one value per `?`. Building fails when
    /// the counts differ.
    Compare {
        field: String,
        op: String,
        values: Vec<Value>,
    },

    /// `field <op>` with nothing bound, e.g. `IS NULL`.
    Operator { field: String, op: String },

    /// `field IN (v1,v2,...)`.
    ///
    /// The values are embedded as SQL literals, NOT bound. Only use this with
    /// trusted, precomputed lists. An empty list renders `1 = 0`.
    InList { field: String, values: Vec<Value> },

    /// `field <op> <sql>` where `sql` is a raw fragment, e.g. a subquery.
    Subquery {
        field: String,
        op: String,
        sql: String,
    },
}

impl Cond {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Cond::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn compare(field: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Cond::Compare {
            field: field.into(),
            op: op.into(),
            values: vec![value.into()],
        }
    }

    /// Operator with its own `?` placeholders, one value each.
    pub fn compare_values<T: Into<Value>>(
        field: impl Into<String>,
        op: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Cond::Compare {
            field: field.into(),
            op: op.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field BETWEEN ? AND ?`
    pub fn between(field: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Cond::Compare {
            field: field.into(),
            op: "BETWEEN ? AND ?".to_string(),
            values: vec![low.into(), high.into()],
        }
    }

    pub fn operator(field: impl Into<String>, op: impl Into<String>) -> Self {
        Cond::Operator {
            field: field.into(),
            op: op.into(),
        }
    }

    pub fn in_list<T: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        Cond::InList {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn subquery(field: impl Into<String>, op: impl Into<String>, sql: impl Into<String>) -> Self {
        Cond::Subquery {
            field: field.into(),
            op: op.into(),
            sql: sql.into(),
        }
    }

    /// Number of values this leaf binds.
    pub fn bind_count(&self) -> usize {
        match self {
            Cond::Eq { .. } => 1,
            Cond::Compare { values, .. } => values.len(),
            _ => 0,
        }
    }

    /// Number of `?` this leaf renders.
    pub fn placeholder_count(&self) -> usize {
        match self {
            Cond::Eq { .. } => 1,
            Cond::Compare { op, .. } => op.matches('?').count().max(1),
            _ => 0,
        }
    }

    /// Fails with [`NdoError::Validation`] when the rendered placeholders
    /// would not match the bound values.
    pub fn validate(&self) -> NdoResult<()> {
        let (placeholders, bound) = (self.placeholder_count(), self.bind_count());
        if placeholders != bound {
            let Cond::Compare { field, op, .. } = self else {
                return Ok(());
            };
            return Err(NdoError::validation(format!(
                "condition `{field} {op}` has {placeholders} placeholder(s) but {bound} value(s)"
            )));
        }
        Ok(())
    }

    /// Render this leaf, pushing its bound values (if any) onto `values`.
    pub fn render(&self, values: &mut Vec<Value>) -> String {
        match self {
            Cond::Eq { field, value } => {
                values.push(value.clone());
                format!("{} = ?", case::column(field))
            }
            Cond::Compare {
                field,
                op,
                values: bound,
            } => {
                values.extend(bound.iter().cloned());
                if op.contains('?') {
                    format!("{} {}", case::column(field), op.trim())
                } else {
                    format!("{} {} ?", case::column(field), op.trim())
                }
            }
            Cond::Operator { field, op } => format!("{} {}", case::column(field), op.trim()),
            Cond::InList { values: list, .. } if list.is_empty() => "1 = 0".to_string(),
            Cond::InList { field, values: list } => {
                let literals: Vec<String> = list.iter().map(Value::to_literal).collect();
                format!("{} IN ({})", case::column(field), literals.join(","))
            }
            Cond::Subquery { field, op, sql } => {
                format!("{} {} {}", case::column(field), op.trim(), sql.trim())
            }
        }
    }

    /// Parse one descriptor entry.
    ///
    /// Accepts `{"field", "operator"?, "value"?, "subquery"?}`; any other
    /// object is `{field: value}` shorthand and yields one equality per key.
    pub fn from_json(entry: &serde_json::Value) -> Vec<Cond> {
        let Some(obj) = entry.as_object() else {
            return Vec::new();
        };

        let Some(field) = obj.get("field").and_then(|f| f.as_str()) else {
            return obj
                .iter()
                .map(|(field, value)| Cond::eq(field.as_str(), Value::from_json(value)))
                .collect();
        };

        let operator = obj.get("operator").and_then(|o| o.as_str());
        let cond = match (obj.get("value"), obj.get("subquery").and_then(|s| s.as_str())) {
            (Some(serde_json::Value::Array(items)), _) => match operator {
                Some(op) if op.contains('?') => {
                    Cond::compare_values(field, op, items.iter().map(Value::from_json))
                }
                _ => Cond::in_list(field, items.iter().map(Value::from_json)),
            },
            (Some(value), _) => match operator {
                Some(op) => Cond::compare(field, op, Value::from_json(value)),
                None => Cond::eq(field, Value::from_json(value)),
            },
            (None, Some(sql)) => Cond::subquery(field, operator.unwrap_or("="), sql),
            (None, None) => Cond::operator(field, operator.unwrap_or("IS NULL")),
        };
        vec![cond]
    }
}

/// A WHERE condition tree: connective groups in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Where {
    groups: Vec<(Connective, Vec<Cond>)>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single AND group.
    pub fn all(conds: impl IntoIterator<Item = Cond>) -> Self {
        let mut w = Self::new();
        w.group(Connective::And, conds);
        w
    }

    /// A single OR group.
    pub fn any(conds: impl IntoIterator<Item = Cond>) -> Self {
        let mut w = Self::new();
        w.group(Connective::Or, conds);
        w
    }

    /// Append a new group.
    pub fn group(&mut self, connective: Connective, conds: impl IntoIterator<Item = Cond>) {
        self.groups.push((connective, conds.into_iter().collect()));
    }

    /// Add a condition to the trailing group of `connective`, opening one if
    /// the last group uses a different connective.
    pub fn push(&mut self, connective: Connective, cond: Cond) {
        match self.groups.last_mut() {
            Some((c, conds)) if *c == connective => conds.push(cond),
            _ => self.groups.push((connective, vec![cond])),
        }
    }

    pub fn and(mut self, cond: Cond) -> Self {
        self.push(Connective::And, cond);
        self
    }

    pub fn or(mut self, cond: Cond) -> Self {
        self.push(Connective::Or, cond);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, conds)| conds.is_empty())
    }

    pub fn groups(&self) -> &[(Connective, Vec<Cond>)] {
        &self.groups
    }

    /// Number of values [`Where::render`] will bind.
    pub fn bind_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|(_, conds)| conds)
            .map(Cond::bind_count)
            .sum()
    }

    /// Check every leaf; see [`Cond::validate`].
    pub fn validate(&self) -> NdoResult<()> {
        self.groups
            .iter()
            .flat_map(|(_, conds)| conds)
            .try_for_each(Cond::validate)
    }

    /// Render the tree without the `WHERE` keyword; empty for an empty tree.
    pub fn render(&self, values: &mut Vec<Value>) -> String {
        let parts: Vec<String> = self
            .groups
            .iter()
            .filter(|(_, conds)| !conds.is_empty())
            .map(|(connective, conds)| {
                let rendered: Vec<String> = conds.iter().map(|c| c.render(values)).collect();
                let sep = format!(" {} ", connective);
                format!("({})", rendered.join(sep.as_str()))
            })
            .collect();
        parts.join(" AND ")
    }

    /// Parse the descriptor form.
    ///
    /// - array: one AND group of entries (see [`Cond::from_json`])
    /// - object keyed by `and` / `or`: one group per key, in key order
    /// - any other object: one AND group of `{field: value}` equalities
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut w = Self::new();
        match value {
            serde_json::Value::Array(entries) => {
                w.group(Connective::And, entries.iter().flat_map(Cond::from_json));
            }
            serde_json::Value::Object(obj) => {
                let keyed = !obj.is_empty() && obj.keys().all(|k| Connective::parse(k).is_some());
                if keyed {
                    for (key, entries) in obj {
                        let connective = Connective::parse(key).unwrap_or_default();
                        let conds: Vec<Cond> = match entries {
                            serde_json::Value::Array(items) => {
                                items.iter().flat_map(Cond::from_json).collect()
                            }
                            other => Cond::from_json(other),
                        };
                        w.group(connective, conds);
                    }
                } else {
                    w.group(Connective::And, Cond::from_json(value));
                }
            }
            _ => {}
        }
        w
    }
}

impl FromIterator<Cond> for Where {
    fn from_iter<I: IntoIterator<Item = Cond>>(iter: I) -> Self {
        Where::all(iter)
    }
}
