//! The `Ndo` executor: runs built statements through an adapter and
//! normalizes what comes back.

use crate::adapter::{Adapter, Response};
use crate::case;
use crate::config::NdoConfig;
use crate::error::{NdoError, NdoResult};
use crate::qb::{DeleteQb, FindQb, InsertQb, Statement, StatementKind, UpdateQb, insert_target};
use crate::trace;
use crate::value::{Record, Value};

/// Result of executing one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// SELECT rows. Built or raw SELECTs have camelCase column keys.
    Rows(Vec<Record>),
    /// INSERT: the id generated for the target table, if any.
    LastId(Option<Value>),
    /// UPDATE / DELETE: affected row count.
    Affected(u64),
}

impl Outcome {
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Outcome::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    pub fn last_id(&self) -> Option<&Value> {
        match self {
            Outcome::LastId(id) => id.as_ref(),
            _ => None,
        }
    }

    pub fn affected(&self) -> u64 {
        match self {
            Outcome::Rows(rows) => rows.len() as u64,
            Outcome::LastId(_) => 1,
            Outcome::Affected(n) => *n,
        }
    }
}

/// Executes query builders and raw SQL on one adapter.
///
/// ```ignore
/// let ndo = Ndo::new(PgAdapter::new(client));
///
/// let users = ndo.find(qb::find("users").eq("status", "active")).await?;
/// let id = ndo.insert(qb::insert("users").set("firstName", "Ada")).await?;
/// let n = ndo.update(qb::update("users").set("status", "inactive").eq("id", 7)).await?;
/// ```
pub struct Ndo<A> {
    adapter: A,
    config: NdoConfig,
}

impl<A: Adapter> Ndo<A> {
    /// Wrap `adapter`, reading the trace level from `NDO_TRACE_LEVEL`.
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, NdoConfig::from_env())
    }

    pub fn with_config(adapter: A, config: NdoConfig) -> Self {
        Self { adapter, config }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn config(&self) -> &NdoConfig {
        &self.config
    }

    pub fn into_inner(self) -> A {
        self.adapter
    }

    // ==================== Builders ====================

    /// Run a SELECT; rows are keyed by camelCase column names.
    ///
    /// ORDER BY terms without an explicit NULL placement get the dialect's.
    pub async fn find(&self, qb: FindQb) -> NdoResult<Vec<Record>> {
        let stmt = qb
            .default_nulls(self.adapter.dialect().default_nulls())
            .build()?;
        Ok(self.run(&stmt).await?.into_rows())
    }

    /// Run a SELECT limited to one row.
    pub async fn find_one(&self, qb: FindQb) -> NdoResult<Option<Record>> {
        Ok(self.find(qb.limit(1)).await?.into_iter().next())
    }

    /// Run an INSERT and return the id generated for its table.
    ///
    /// An insert without values sends nothing and returns `None`.
    pub async fn insert(&self, qb: InsertQb) -> NdoResult<Option<Value>> {
        let stmt = qb.build()?;
        if stmt.is_empty() {
            return Ok(None);
        }
        Ok(self.run(&stmt).await?.last_id().cloned())
    }

    /// Run an UPDATE. Without SET columns nothing is sent.
    pub async fn update(&self, qb: UpdateQb) -> NdoResult<u64> {
        let stmt = qb.build()?;
        if stmt.is_empty() {
            return Ok(0);
        }
        Ok(self.run(&stmt).await?.affected())
    }

    /// Run a DELETE. Without conditions nothing is sent.
    pub async fn delete(&self, qb: DeleteQb) -> NdoResult<u64> {
        let stmt = qb.build()?;
        if stmt.is_empty() {
            return Ok(0);
        }
        Ok(self.run(&stmt).await?.affected())
    }

    // ==================== Raw SQL ====================

    /// Execute raw SQL with `?` placeholders.
    ///
    /// The outcome follows the leading keyword. For an INSERT the last id is
    /// looked up for the table named after `INSERT INTO`.
    pub async fn execute(&self, sql: &str, values: &[Value]) -> NdoResult<Outcome> {
        self.execute_statement(&Statement::new(sql, values.to_vec()))
            .await
    }

    /// Execute a built statement. The empty statement is rejected.
    pub async fn execute_statement(&self, stmt: &Statement) -> NdoResult<Outcome> {
        if stmt.is_empty() {
            return Err(NdoError::EmptyStatement("refusing to send blank SQL"));
        }
        self.run(stmt).await
    }

    // ==================== Transactions ====================

    pub async fn commit(&self) -> NdoResult<()> {
        self.adapter.commit().await
    }

    pub async fn rollback(&self) -> NdoResult<()> {
        self.adapter.rollback().await
    }

    async fn run(&self, stmt: &Statement) -> NdoResult<Outcome> {
        let kind = stmt.kind();
        trace::statement(&self.config, kind, &stmt.sql, &stmt.values);

        let response = self
            .adapter
            .execute(&stmt.sql, &stmt.values)
            .await
            .inspect_err(|e| trace::failure(&self.config, &stmt.sql, &stmt.values, e))?;

        match kind {
            StatementKind::Select => Ok(Outcome::Rows(
                response
                    .into_rows()
                    .into_iter()
                    .map(|row| row.rename_columns(case::camel))
                    .collect(),
            )),
            StatementKind::Insert => {
                let table = stmt.table.as_deref().or_else(|| insert_target(&stmt.sql));
                let id = match table {
                    Some(table) => self.last_id(table).await?,
                    None => None,
                };
                Ok(Outcome::LastId(id))
            }
            StatementKind::Update | StatementKind::Delete => {
                Ok(Outcome::Affected(response.affected()))
            }
            StatementKind::Other => Ok(match response {
                Response::Rows(rows) => Outcome::Rows(rows),
                Response::Affected(n) => Outcome::Affected(n),
            }),
        }
    }

    async fn last_id(&self, table: &str) -> NdoResult<Option<Value>> {
        self.adapter.last_id(table).await.inspect_err(|e| {
            let sql = self.adapter.dialect().last_id_sql(table);
            trace::failure(&self.config, &sql, &[], e)
        })
    }
}
