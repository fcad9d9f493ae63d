//! PostgreSQL adapter over `tokio-postgres`.

use crate::adapter::{Adapter, Response};
use crate::dialect::{Dialect, Postgres};
use crate::error::{NdoError, NdoResult};
use crate::qb::StatementKind;
use crate::value::{Record, Value};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use std::future::Future;
use std::str::FromStr;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use uuid::Uuid;

/// A PostgreSQL connection: a client, a transaction or a pooled client.
pub trait PgConnection: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = NdoResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = NdoResult<u64>> + Send;

    /// Run one or more statements without parameters.
    fn batch_execute(&self, sql: &str) -> impl Future<Output = NdoResult<()>> + Send;
}

impl PgConnection for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<Vec<Row>> {
        Ok(tokio_postgres::Client::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, params).await?)
    }

    async fn batch_execute(&self, sql: &str) -> NdoResult<()> {
        Ok(tokio_postgres::Client::batch_execute(self, sql).await?)
    }
}

impl PgConnection for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<Vec<Row>> {
        Ok(tokio_postgres::Transaction::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, params).await?)
    }

    async fn batch_execute(&self, sql: &str) -> NdoResult<()> {
        Ok(tokio_postgres::Transaction::batch_execute(self, sql).await?)
    }
}

#[cfg(feature = "pool")]
impl PgConnection for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<Vec<Row>> {
        PgConnection::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<u64> {
        PgConnection::execute(&**self, sql, params).await
    }

    async fn batch_execute(&self, sql: &str) -> NdoResult<()> {
        PgConnection::batch_execute(&**self, sql).await
    }
}

#[cfg(feature = "pool")]
impl PgConnection for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper).
        PgConnection::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> NdoResult<u64> {
        PgConnection::execute(&**self, sql, params).await
    }

    async fn batch_execute(&self, sql: &str) -> NdoResult<()> {
        PgConnection::batch_execute(&**self, sql).await
    }
}

/// [`Adapter`] over any [`PgConnection`].
///
/// Placeholders are rewritten to `$1..$n` before the statement is sent.
/// COMMIT and ROLLBACK are plain statements, so they only have an effect
/// inside a transaction opened with `BEGIN` on the same connection.
pub struct PgAdapter<C> {
    client: C,
    dialect: Postgres,
}

impl<C: PgConnection> PgAdapter<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            dialect: Postgres::new(),
        }
    }

    /// Append `NULLS FIRST` to ORDER BY terms of built SELECTs (default: on).
    pub fn nulls_first(mut self, enabled: bool) -> Self {
        self.dialect = self.dialect.nulls_first(enabled);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: PgConnection> Adapter for PgAdapter<C> {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> NdoResult<Response> {
        let sql = self.dialect.rewrite_placeholders(sql);
        let params: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();

        match StatementKind::from_sql(&sql) {
            StatementKind::Insert | StatementKind::Update | StatementKind::Delete => {
                let affected = self.client.execute(&sql, &params).await?;
                Ok(Response::Affected(affected))
            }
            StatementKind::Select | StatementKind::Other => {
                let rows = self.client.query(&sql, &params).await?;
                let records = rows.iter().map(decode_row).collect::<NdoResult<Vec<_>>>()?;
                Ok(Response::Rows(records))
            }
        }
    }

    async fn commit(&self) -> NdoResult<()> {
        self.client.batch_execute("COMMIT").await
    }

    async fn rollback(&self) -> NdoResult<()> {
        self.client.batch_execute("ROLLBACK").await
    }
}

// ==================== Binding ====================

type BoxError = Box<dyn Error + Sync + Send>;

/// Values adapt to the parameter type the server inferred, so text from a
/// JSON descriptor can bind to integer, boolean, uuid or json columns.
impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => match *ty {
                Type::BOOL => v.to_sql(ty, out),
                _ => v.to_string().to_sql(ty, out),
            },
            Value::Int(v) => int_to_sql(*v, ty, out),
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => v.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*v)?.to_sql(ty, out),
                _ => v.to_string().to_sql(ty, out),
            },
            Value::Text(s) => text_to_sql(s, ty, out),
            Value::Bytes(b) => b.to_sql(ty, out),
            Value::Json(j) => match *ty {
                Type::JSON | Type::JSONB => j.to_sql(ty, out),
                _ => j.to_string().to_sql(ty, out),
            },
            Value::Uuid(u) => match *ty {
                Type::UUID => u.to_sql(ty, out),
                _ => u.to_string().to_sql(ty, out),
            },
            Value::Date(d) => match *ty {
                Type::DATE => d.to_sql(ty, out),
                _ => d.to_string().to_sql(ty, out),
            },
            Value::Timestamp(t) => match *ty {
                Type::TIMESTAMPTZ => Utc.from_utc_datetime(t).to_sql(ty, out),
                Type::DATE => t.date().to_sql(ty, out),
                Type::TIMESTAMP => t.to_sql(ty, out),
                _ => self.to_string().to_sql(ty, out),
            },
            Value::TimestampTz(t) => match *ty {
                Type::TIMESTAMP => t.naive_utc().to_sql(ty, out),
                Type::TIMESTAMPTZ => t.to_sql(ty, out),
                _ => self.to_string().to_sql(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ => v.to_string().to_sql(ty, out),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => numeric_to_sql(s, ty, out),
        Type::BOOL => parse_bool(s)
            .ok_or_else(|| format!("invalid boolean: {s:?}"))?
            .to_sql(ty, out),
        Type::UUID => Uuid::parse_str(s.trim())?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::DATE => s.trim().parse::<NaiveDate>()?.to_sql(ty, out),
        Type::TIMESTAMP => s.trim().parse::<NaiveDateTime>()?.to_sql(ty, out),
        Type::TIMESTAMPTZ => s.trim().parse::<DateTime<Utc>>()?.to_sql(ty, out),
        _ => s.to_sql(ty, out),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "1" | "y" | "yes" | "on" => Some(true),
        "f" | "false" | "0" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ==================== Decoding ====================

/// Decode a row into a [`Record`] keyed by the driver's column names.
pub fn decode_row(row: &Row) -> NdoResult<Record> {
    let mut record = Record::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_cell(row, idx, column.type_())
            .map_err(|e| NdoError::decode(column.name(), e.to_string()))?;
        record.push(column.name(), value);
    }
    Ok(record)
}

fn decode_cell(row: &Row, idx: usize, ty: &Type) -> Result<Value, tokio_postgres::Error> {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx)?.map(|v| Value::Int(v.into())),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.map(|v| Value::Int(v.into())),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(Value::Int),
        Type::OID => row.try_get::<_, Option<u32>>(idx)?.map(|v| Value::Int(v.into())),
        Type::FLOAT4 => row.try_get::<_, Option<f32>>(idx)?.map(|v| Value::Float(v.into())),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(Value::Float),
        // exact text, scale kept
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)?
            .map(|d| Value::Text(d.to_string())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(idx)?.map(Value::Text)
        }
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(Value::Bytes),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(idx)?
            .map(Value::Json),
        Type::UUID => row.try_get::<_, Option<Uuid>>(idx)?.map(Value::Uuid),
        Type::DATE => row.try_get::<_, Option<NaiveDate>>(idx)?.map(Value::Date),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(Value::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(Value::TimestampTz),
        _ => row.try_get::<_, Option<AnyCell>>(idx)?.map(|cell| cell.0),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Cell of a type without a dedicated mapping.
///
/// Raw text if it is valid UTF-8 (enums, citext, ...), bytes otherwise.
struct AnyCell(Value);

impl<'a> FromSql<'a> for AnyCell {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(AnyCell(match std::str::from_utf8(raw) {
            Ok(s) => Value::Text(s.to_string()),
            Err(_) => Value::Bytes(raw.to_vec()),
        }))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Bind decimal text (`-12.50`, `1e-3`) to a NUMERIC parameter.
fn numeric_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    let s = s.trim();
    let decimal = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))?;
    decimal.to_sql(ty, out)
}
