//! SQL trace events.
//!
//! With the `tracing` feature, traced statements are emitted on target
//! `ndo.sql`; without it these functions do nothing.

use crate::config::NdoConfig;
#[cfg(feature = "tracing")]
use crate::config::TraceLevel;
use crate::error::NdoError;
use crate::qb::StatementKind;
use crate::value::Value;

/// Emit a statement about to be sent, if tracing is enabled.
pub(crate) fn statement(config: &NdoConfig, kind: StatementKind, sql: &str, values: &[Value]) {
    #[cfg(feature = "tracing")]
    {
        let param_count = values.len();
        let sql = truncate_sql(config, sql);
        let values = tracing::field::debug(values);
        match config.trace {
            TraceLevel::Off => {}
            TraceLevel::Debug => tracing::debug!(
                target: "ndo.sql",
                kind = kind.as_str(),
                param_count,
                sql = %sql,
                values = values,
            ),
            TraceLevel::Trace => tracing::trace!(
                target: "ndo.sql",
                kind = kind.as_str(),
                param_count,
                sql = %sql,
                values = values,
            ),
        }
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (config, kind, sql, values);
    }
}

/// Report a statement the driver rejected. Not gated on the trace level.
pub(crate) fn failure(config: &NdoConfig, sql: &str, values: &[Value], err: &NdoError) {
    #[cfg(feature = "tracing")]
    {
        let sql = truncate_sql(config, sql);
        tracing::error!(
            target: "ndo.sql",
            status = err.status_code(),
            sql = %sql,
            values = ?values,
            error = %err,
            "statement failed"
        );
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (config, sql, values, err);
    }
}

#[cfg(feature = "tracing")]
fn truncate_sql(config: &NdoConfig, sql: &str) -> String {
    match config.max_sql_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg(any(feature = "tracing", test))]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes
        assert_eq!(truncate_sql_bytes("é", 1), "");
    }
}
