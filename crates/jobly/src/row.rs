//! Row mapping traits

use crate::error::{ModelError, ModelResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// Models read columns by their external (aliased) names; see
/// [`ColumnMap::select_list`](crate::ColumnMap::select_list).
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> ModelResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning ModelError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> ModelResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> ModelResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| ModelError::decode(column, e.to_string()))
    }
}
