//! Query builders.
//!
//! Builders turn declarative descriptors into SQL with `?` placeholders and
//! return the bound values alongside, in emission order. They never touch a
//! connection: execution lives in [`crate::Ndo`], and dialect rewrites (such
//! as PostgreSQL's `$n` numbering) live in the adapters.
//!
//! # Usage
//!
//! ```ignore
//! use ndo::qb;
//!
//! let stmt = qb::find("users|u")
//!     .fields(["u.id", "firstName", "r.name|role"])
//!     .join(qb::Join::left("roles|r").on("r.id = u.role_id"))
//!     .eq("status", "active")
//!     .order_by_desc("u.created_at")
//!     .limit(20)
//!     .build()?;
//!
//! let stmt = qb::insert("users")
//!     .row(Fields::new().set("firstName", "Ada").call("createdAt", "NOW"))
//!     .build()?;
//! ```
//!
//! Table and column identifiers are interpolated as written. They are never
//! quoted, so they must not come from untrusted input.

#[macro_use]
mod macros;

mod cond;
mod delete;
mod insert;
mod join;
mod select;
mod statement;
mod update;

pub use cond::{Cond, Connective, Where};
pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use join::{Join, JoinKind};
pub use select::{Direction, FindQb, NullsOrder, OrderBy};
pub use statement::{Statement, StatementKind, insert_target};
pub use update::UpdateQb;

/// Create a SELECT builder. `table` may be written `table|alias`.
pub fn find(table: &str) -> FindQb {
    FindQb::new(table)
}

/// Create an INSERT builder.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder.
///
/// A DELETE without conditions builds the empty statement, which executors
/// never send.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Split `name|alias` shorthand. Without `|` the alias is the name itself.
pub(crate) fn split_alias(spec: &str) -> (&str, &str) {
    match spec.split_once('|') {
        Some((name, alias)) => (name.trim(), alias.trim()),
        None => (spec.trim(), spec.trim()),
    }
}

#[cfg(test)]
mod tests;
