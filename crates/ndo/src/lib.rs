//! # ndo
//!
//! Node Data Objects: declarative query descriptions rendered to
//! parameterized SQL for PostgreSQL and SAP HANA.
//!
//! ## Features
//!
//! - **Builders, not strings**: `find` / `insert` / `update` / `delete`
//!   builders render SQL with `?` placeholders and return the bound values
//!   in emission order
//! - **Descriptor friendly**: conditions, joins, ordering and value maps can
//!   also be given as JSON descriptors
//! - **Dialect adapters**: PostgreSQL (`$n` placeholders, `NULLS FIRST`
//!   ordering) and, with the `hana` feature, SAP HANA
//! - **Normalized results**: SELECT rows come back keyed by camelCase column
//!   names; INSERT returns the generated id
//! - **Safe defaults**: a DELETE without conditions is never sent
//!
//! ## Usage
//!
//! ```ignore
//! use ndo::{Ndo, PgAdapter, qb};
//!
//! let ndo = Ndo::new(PgAdapter::new(client));
//!
//! // SELECT
//! let users = ndo
//!     .find(
//!         qb::find("users|u")
//!             .fields(["u.id", "firstName"])
//!             .eq("status", "active")
//!             .order_by_desc("u.created_at")
//!             .limit(10),
//!     )
//!     .await?;
//!
//! // INSERT
//! let id = ndo
//!     .insert(qb::insert("users").set("firstName", "Ada").call("createdAt", "NOW"))
//!     .await?;
//!
//! // UPDATE
//! ndo.update(qb::update("users").set("status", "inactive").eq("id", 7))
//!     .await?;
//!
//! // DELETE
//! ndo.delete(qb::delete("users").eq("id", 7)).await?;
//! ```
//!
//! Setting `NDO_TRACE_LEVEL=DEBUG` traces every statement and its values on
//! the `ndo.sql` tracing target (feature `tracing`).

pub mod adapter;
pub mod case;
pub mod config;
pub mod dialect;
pub mod error;
pub mod qb;
pub mod value;

mod ndo;
mod trace;

pub use adapter::postgres::{PgAdapter, PgConnection};
pub use adapter::{Adapter, Response};
pub use config::{NdoConfig, TraceLevel};
pub use dialect::{Dialect, Hana, Postgres};
pub use error::{NdoError, NdoResult};
pub use ndo::{Ndo, Outcome};
pub use value::{FieldValue, Fields, Record, Value};

// Re-export qb entry points for easy access
pub use qb::{
    Cond, DeleteQb, FindQb, InsertQb, Join, JoinKind, Statement, UpdateQb, Where, delete, find,
    insert, update,
};

#[cfg(feature = "hana")]
pub use adapter::hana::HanaAdapter;
