//! JOIN descriptors.

use crate::qb::split_alias;
use std::fmt;

/// Join type. Unknown kinds from descriptors are upper-cased and kept as written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Other(String),
}

impl JoinKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => JoinKind::Inner,
            "LEFT" => JoinKind::Left,
            "RIGHT" => JoinKind::Right,
            "FULL" => JoinKind::Full,
            "CROSS" => JoinKind::Cross,
            other => JoinKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => f.write_str("INNER"),
            JoinKind::Left => f.write_str("LEFT"),
            JoinKind::Right => f.write_str("RIGHT"),
            JoinKind::Full => f.write_str("FULL"),
            JoinKind::Cross => f.write_str("CROSS"),
            JoinKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// `KIND JOIN table AS alias ON cond AND cond`.
///
/// `table` may be written `table|alias`; the ON conditions are raw SQL.
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    kind: JoinKind,
    table: String,
    on: Vec<String>,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            on: Vec::new(),
        }
    }

    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, table)
    }

    pub fn left(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, table)
    }

    /// Add an ON condition; multiple conditions are joined with `AND`.
    pub fn on(mut self, cond: impl Into<String>) -> Self {
        self.on.push(cond.into());
        self
    }

    pub fn kind(&self) -> &JoinKind {
        &self.kind
    }

    pub fn to_sql(&self) -> String {
        let (table, alias) = split_alias(&self.table);
        let mut sql = format!("{} JOIN {} AS {}", self.kind, table, alias);
        if !self.on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&self.on.join(" AND "));
        }
        sql
    }

    /// Parse `{"table": "t|a", "on": "x = y" | ["x = y", ...]}`.
    pub fn from_json(kind: JoinKind, value: &serde_json::Value) -> Option<Self> {
        let table = value.get("table")?.as_str()?;
        let mut join = Join::new(kind, table);
        match value.get("on") {
            Some(serde_json::Value::String(cond)) => join.on.push(cond.clone()),
            Some(serde_json::Value::Array(conds)) => {
                join.on
                    .extend(conds.iter().filter_map(|c| c.as_str()).map(str::to_string));
            }
            _ => {}
        }
        Some(join)
    }

    /// Parse a join list: an array (all INNER) or an object keyed by join kind.
    pub fn list_from_json(value: &serde_json::Value) -> Vec<Self> {
        match value {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| Join::from_json(JoinKind::Inner, item))
                .collect(),
            serde_json::Value::Object(by_kind) => by_kind
                .iter()
                .flat_map(|(kind, items)| {
                    let kind = JoinKind::parse(kind);
                    let items: Vec<&serde_json::Value> = match items {
                        serde_json::Value::Array(list) => list.iter().collect(),
                        single => vec![single],
                    };
                    items
                        .into_iter()
                        .filter_map(move |item| Join::from_json(kind.clone(), item))
                        .collect::<Vec<_>>()
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
