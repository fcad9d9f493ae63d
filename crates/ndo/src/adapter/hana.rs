//! SAP HANA adapter over `hdbconnect`.
//!
//! `hdbconnect` is a blocking driver: every call runs on tokio's blocking
//! pool, one at a time per connection.

use crate::adapter::{Adapter, Response};
use crate::dialect::{Dialect, Hana};
use crate::error::{NdoError, NdoResult};
use crate::qb::StatementKind;
use crate::value::{Record, Value};
use hdbconnect::{Connection, HdbResult, ResultSet, Row, TypeId};
use std::sync::{Arc, Mutex};

/// [`Adapter`] over an open `hdbconnect` connection.
///
/// Placeholders stay `?`. Values are handed to the driver through their
/// `serde` representation.
#[derive(Clone)]
pub struct HanaAdapter {
    conn: Arc<Mutex<Connection>>,
    dialect: Hana,
}

impl HanaAdapter {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            dialect: Hana,
        }
    }

    async fn blocking<T, F>(&self, f: F) -> NdoResult<T>
    where
        F: FnOnce(&Connection) -> NdoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| NdoError::Other("HANA connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| NdoError::Other(format!("HANA task failed: {e}")))?
    }
}

impl Adapter for HanaAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> NdoResult<Response> {
        let sql = self.dialect.rewrite_placeholders(sql);
        let values = values.to_vec();
        self.blocking(move |conn| run(conn, &sql, values)).await
    }

    async fn commit(&self) -> NdoResult<()> {
        self.blocking(|conn| Ok(conn.commit()?)).await
    }

    async fn rollback(&self) -> NdoResult<()> {
        self.blocking(|conn| Ok(conn.rollback()?)).await
    }
}

/// How a statement is sent to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Unprepared query returning a result set.
    Query,
    /// Prepared statement returning affected row counts.
    PreparedAffected,
    /// Prepared statement returning a result set.
    PreparedRows,
}

fn route(kind: StatementKind, has_values: bool) -> Route {
    match kind {
        StatementKind::Insert | StatementKind::Update | StatementKind::Delete => {
            Route::PreparedAffected
        }
        StatementKind::Select | StatementKind::Other if has_values => Route::PreparedRows,
        StatementKind::Select | StatementKind::Other => Route::Query,
    }
}

fn run(conn: &Connection, sql: &str, values: Vec<Value>) -> NdoResult<Response> {
    let route = route(StatementKind::from_sql(sql), !values.is_empty());
    if route == Route::Query {
        return Ok(Response::Rows(decode_result_set(conn.query(sql)?)?));
    }

    let mut prepared = conn.prepare(sql)?;
    let response = if values.is_empty() {
        prepared.execute(&())?
    } else {
        prepared.execute(&values)?
    };

    if route == Route::PreparedAffected {
        let affected: usize = response.into_affected_rows()?.iter().sum();
        Ok(Response::Affected(affected as u64))
    } else {
        Ok(Response::Rows(decode_result_set(response.into_resultset()?)?))
    }
}

fn decode_result_set(result_set: ResultSet) -> NdoResult<Vec<Record>> {
    let columns: Vec<(String, CellKind)> = result_set
        .metadata()
        .iter()
        .map(|field| {
            let name = if field.displayname().is_empty() {
                field.columnname().to_string()
            } else {
                field.displayname().to_string()
            };
            (name, cell_kind(field.type_id()))
        })
        .collect();

    let mut records = Vec::new();
    for row in result_set {
        let row = row?;
        let mut record = Record::with_capacity(columns.len());
        for (idx, (name, kind)) in columns.iter().enumerate() {
            let value = if idx < row.len() {
                decode_cell(&row, idx, *kind)
                    .map_err(|e| NdoError::decode(name.as_str(), e.to_string()))?
            } else {
                Value::Null
            };
            record.push(name.as_str(), value);
        }
        records.push(record);
    }
    Ok(records)
}

/// The [`Value`] variant a HANA column decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Bool,
    Int,
    Float,
    /// exact text, like NUMERIC on PostgreSQL
    Decimal,
    Date,
    Timestamp,
    Text,
}

fn cell_kind(type_id: TypeId) -> CellKind {
    match type_id {
        TypeId::BOOLEAN => CellKind::Bool,
        TypeId::TINYINT | TypeId::SMALLINT | TypeId::INT | TypeId::BIGINT => CellKind::Int,
        TypeId::REAL | TypeId::DOUBLE => CellKind::Float,
        TypeId::DECIMAL => CellKind::Decimal,
        TypeId::DAYDATE => CellKind::Date,
        TypeId::LONGDATE | TypeId::SECONDDATE => CellKind::Timestamp,
        _ => CellKind::Text,
    }
}

fn decode_cell(row: &Row, idx: usize, kind: CellKind) -> HdbResult<Value> {
    let cell = || row[idx].clone();
    let value = match kind {
        CellKind::Bool => cell().try_into::<Option<bool>>()?.map(Value::Bool),
        CellKind::Int => cell().try_into::<Option<i64>>()?.map(Value::Int),
        CellKind::Float => cell().try_into::<Option<f64>>()?.map(Value::Float),
        CellKind::Decimal | CellKind::Text => cell().try_into::<Option<String>>()?.map(Value::Text),
        CellKind::Date => cell()
            .try_into::<Option<chrono::NaiveDate>>()?
            .map(Value::Date),
        CellKind::Timestamp => cell()
            .try_into::<Option<chrono::NaiveDateTime>>()?
            .map(Value::Timestamp),
    };
    Ok(value.unwrap_or(Value::Null))
}
