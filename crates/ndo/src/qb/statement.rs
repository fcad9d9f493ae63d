//! Built statements: SQL text plus the positional value buffer.

use crate::value::Value;

/// The kind of SQL statement, inferred from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Detect the statement kind from SQL text.
    ///
    /// Leading whitespace, comments and parentheses are skipped.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") {
            StatementKind::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            StatementKind::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            StatementKind::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Other => "OTHER",
        }
    }
}

/// SQL with `?` placeholders and the values bound to them, in order.
///
/// An empty `sql` means the builder refused to produce a statement (e.g. a
/// DELETE without conditions); executors must not send it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
    /// Target table for INSERTs, used to look up the generated id.
    pub table: Option<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
            table: None,
        }
    }

    /// The no-op statement.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }

    pub fn kind(&self) -> StatementKind {
        StatementKind::from_sql(&self.sql)
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Table named by an `INSERT INTO <table> ...` statement (third token).
pub fn insert_target(sql: &str) -> Option<&str> {
    let mut tokens = strip_sql_prefix(sql).split_whitespace();
    let insert = tokens.next()?;
    let into = tokens.next()?;
    if !insert.eq_ignore_ascii_case("INSERT") || !into.eq_ignore_ascii_case("INTO") {
        return None;
    }
    tokens.next().map(|t| t.split('(').next().unwrap_or(t))
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses.
pub(crate) fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            match s.find('\n') {
                Some(pos) => {
                    s = &s[pos + 1..];
                    continue;
                }
                None => return "",
            }
        }
        if s.starts_with("/*") {
            match s.find("*/") {
                Some(pos) => {
                    s = &s[pos + 2..];
                    continue;
                }
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_detection() {
        assert_eq!(StatementKind::from_sql("SELECT * FROM t"), StatementKind::Select);
        assert_eq!(StatementKind::from_sql("  select 1"), StatementKind::Select);
        assert_eq!(StatementKind::from_sql("(SELECT 1)"), StatementKind::Select);
        assert_eq!(
            StatementKind::from_sql("-- note\nINSERT INTO t (a) VALUES (?)"),
            StatementKind::Insert
        );
        assert_eq!(StatementKind::from_sql("UPDATE t SET a = ?"), StatementKind::Update);
        assert_eq!(StatementKind::from_sql("delete from t"), StatementKind::Delete);
        assert_eq!(StatementKind::from_sql("CALL proc()"), StatementKind::Other);
        assert_eq!(StatementKind::from_sql(""), StatementKind::Other);
    }

    #[test]
    fn test_insert_target() {
        assert_eq!(insert_target("INSERT INTO users (a) VALUES (?)"), Some("users"));
        assert_eq!(insert_target("insert into users(a) values (?)"), Some("users"));
        assert_eq!(insert_target("UPDATE users SET a = 1"), None);
    }
}
