//! Parameter-safe SQL fragments.
//!
//! `Sql` stores text and bound values separately and numbers the `$1, $2, ...`
//! placeholders itself, so fragments built by different helpers can be joined
//! without manually tracking parameter indices.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql;
//!
//! let mut q = sql("SELECT id, title FROM jobs WHERE salary >= ");
//! q.push_bind(50_000_i32);
//! q.push(" AND title ILIKE ").push_bind("%engineer%".to_string());
//!
//! assert_eq!(q.to_sql(), "SELECT id, title FROM jobs WHERE salary >= $1 AND title ILIKE $2");
//! ```

mod builder;


use std::sync::Arc;
use tokio_postgres::types::ToSql;

pub use builder::Sql;

/// A bound parameter value.
pub type Param = Arc<dyn ToSql + Sync + Send>;

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}
