//! Per-backend SQL text rules.

use crate::qb::NullsOrder;

pub trait Dialect: Send + Sync {
    /// Name of the dialect (e.g. "PostgreSQL", "HANA").
    fn name(&self) -> &'static str;

    /// Returns the placeholder for the bind parameter at `index` (zero-based).
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - HANA uses `?`
    fn placeholder(&self, index: usize) -> String;

    /// Rewrite the builders' `?` placeholders into this dialect's form,
    /// numbering them left to right.
    ///
    /// This is a plain character scan: a `?` inside a string literal or a
    /// quoted identifier is rewritten too.
    fn rewrite_placeholders(&self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut index = 0;
        for ch in sql.chars() {
            if ch == '?' {
                out.push_str(&self.placeholder(index));
                index += 1;
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Query returning the id generated by the last INSERT into `table`,
    /// as a single column named `id`.
    fn last_id_sql(&self, table: &str) -> String;

    /// NULL placement applied to ORDER BY terms that do not choose one.
    fn default_nulls(&self) -> Option<NullsOrder>;
}

#[derive(Debug, Clone)]
pub struct Postgres {
    nulls_first: bool,
}

impl Postgres {
    pub fn new() -> Self {
        Self { nulls_first: true }
    }

    /// Append `NULLS FIRST` to ORDER BY terms (default: on).
    pub fn nulls_first(mut self, enabled: bool) -> Self {
        self.nulls_first = enabled;
        self
    }
}

impl Default for Postgres {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn last_id_sql(&self, table: &str) -> String {
        format!("SELECT currval(pg_get_serial_sequence('{table}','id')) as \"id\"")
    }

    fn default_nulls(&self) -> Option<NullsOrder> {
        self.nulls_first.then_some(NullsOrder::First)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hana;

impl Dialect for Hana {
    fn name(&self) -> &'static str {
        "HANA"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn rewrite_placeholders(&self, sql: &str) -> String {
        sql.to_string()
    }

    fn last_id_sql(&self, _table: &str) -> String {
        "SELECT TO_BIGINT(CURRENT_IDENTITY_VALUE()) as \"id\" FROM dummy".to_string()
    }

    fn default_nulls(&self) -> Option<NullsOrder> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_numbering() {
        let pg = Postgres::new();
        assert_eq!(pg.rewrite_placeholders("a = ? AND b = ?"), "a = $1 AND b = $2");
        assert_eq!(pg.rewrite_placeholders("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_postgres_numbering_past_nine() {
        let sql = vec!["?"; 12].join(", ");
        let rewritten = Postgres::new().rewrite_placeholders(&sql);
        assert!(rewritten.starts_with("$1, $2"));
        assert!(rewritten.ends_with("$11, $12"));
    }

    #[test]
    fn test_hana_keeps_question_marks() {
        assert_eq!(Hana.rewrite_placeholders("a = ? AND b = ?"), "a = ? AND b = ?");
    }

    #[test]
    fn test_last_id_sql() {
        assert_eq!(
            Postgres::new().last_id_sql("users"),
            "SELECT currval(pg_get_serial_sequence('users','id')) as \"id\""
        );
        assert_eq!(
            Hana.last_id_sql("users"),
            "SELECT TO_BIGINT(CURRENT_IDENTITY_VALUE()) as \"id\" FROM dummy"
        );
    }

    #[test]
    fn test_default_nulls() {
        assert_eq!(Postgres::new().default_nulls(), Some(NullsOrder::First));
        assert_eq!(Postgres::new().nulls_first(false).default_nulls(), None);
        assert_eq!(Hana.default_nulls(), None);
    }
}
