//! Database adapters.
//!
//! An [`Adapter`] takes SQL written with `?` placeholders, applies its
//! dialect's rewrites, binds the values and runs the statement on its
//! connection.

use crate::dialect::Dialect;
use crate::error::NdoResult;
use crate::value::{Record, Value};
use std::future::Future;

pub mod postgres;

#[cfg(feature = "hana")]
pub mod hana;

/// What the driver returned for one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// Result rows, keyed by the driver's column names.
    Rows(Vec<Record>),
    /// Rows affected by an INSERT / UPDATE / DELETE.
    Affected(u64),
}

impl Response {
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Response::Rows(rows) => rows,
            Response::Affected(_) => Vec::new(),
        }
    }

    pub fn affected(&self) -> u64 {
        match self {
            Response::Rows(rows) => rows.len() as u64,
            Response::Affected(n) => *n,
        }
    }
}

/// A connection plus the SQL dialect it speaks.
///
/// SELECT and unrecognized statements come back as [`Response::Rows`];
/// INSERT, UPDATE and DELETE as [`Response::Affected`].
pub trait Adapter: Send + Sync {
    fn dialect(&self) -> &dyn Dialect;

    /// Execute `sql` (with `?` placeholders) binding `values` in order.
    fn execute(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = NdoResult<Response>> + Send;

    /// The id generated by the last INSERT into `table` on this connection.
    ///
    /// The default implementation runs the dialect's last-id query and
    /// returns its first column; NULL maps to `None`.
    fn last_id(&self, table: &str) -> impl Future<Output = NdoResult<Option<Value>>> + Send {
        let sql = self.dialect().last_id_sql(table);
        async move {
            let rows = self.execute(&sql, &[]).await?.into_rows();
            Ok(rows
                .into_iter()
                .next()
                .and_then(Record::into_first)
                .filter(|v| !v.is_null()))
        }
    }

    fn commit(&self) -> impl Future<Output = NdoResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = NdoResult<()>> + Send;
}
