//! Partial UPDATE assignment clauses.
//!
//! A [`Patch`] holds only the fields a caller wants to change, keyed by their
//! external name. [`sql_for_partial_update`] turns it into a
//! `"col" = $1, "other_col" = $2` fragment whose values are bound in the same
//! order.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{ColumnMap, Patch, sql, sql_for_partial_update};
//!
//! let mut patch = Patch::new();
//! patch.set("title", "Staff Engineer".to_string());
//! patch.set_null::<i32>("salary");
//!
//! let set = sql_for_partial_update(&patch, &ColumnMap::identity())?;
//! let mut q = sql("UPDATE jobs SET ");
//! q.push_sql(set);
//! q.push(" WHERE id = ").push_bind(job_id);
//! // UPDATE jobs SET "title" = $1, "salary" = $2 WHERE id = $3
//! ```

use crate::columns::ColumnMap;
use crate::error::{ModelError, ModelResult};
use crate::ident::Ident;
use crate::sql::{Param, Sql};
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// An ordered, presence-aware set of field changes.
///
/// A field is part of the update only if it was set. Setting a field to
/// `None` (or via [`Patch::set_null`]) writes SQL `NULL`, which is different
/// from leaving the field out.
#[derive(Debug, Default)]
pub struct Patch {
    fields: Vec<(String, Param)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Setting the same field twice keeps its first position.
    pub fn set<T>(&mut self, field: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.set_value(field, Arc::new(value))
    }

    /// Set a field to SQL `NULL`.
    ///
    /// `T` is the column's Rust type, used to encode the typed null.
    pub fn set_null<T>(&mut self, field: impl Into<String>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.set(field, None::<T>)
    }

    /// Set a field to an already type-erased value.
    pub fn set_value(&mut self, field: impl Into<String>, value: Param) -> &mut Self {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Whether `field` is part of this patch.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Build the assignment list of an UPDATE statement from a partial field set.
///
/// Each field is translated through `columns` (falling back to its external
/// name), quoted, and assigned the next placeholder. The pairs are walked once,
/// so placeholder `$i` always binds to the `i`-th field of the patch.
///
/// Fails with [`ModelError::BadRequest`] when the patch is empty. Type and
/// range checks on individual values are up to the caller.
pub fn sql_for_partial_update(fields: &Patch, columns: &ColumnMap) -> ModelResult<Sql> {
    if fields.is_empty() {
        return Err(ModelError::bad_request("No data"));
    }

    let mut set = Sql::empty();
    for (i, (field, value)) in fields.iter().enumerate() {
        if i > 0 {
            set.push(", ");
        }
        let column = Ident::quoted(columns.storage_name(field))?;
        set.push_ident(&column)
            .push(" = ")
            .push_bind_value(Arc::clone(value));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_values(sql: &Sql) -> Vec<String> {
        sql.params().iter().map(|v| format!("{v:?}")).collect()
    }

    #[test]
    fn translates_and_numbers_user_fields() {
        let mut data = Patch::new();
        data.set("firstName", "nathan".to_string())
            .set("lastName", "irrelevant".to_string())
            .set("email", "test@test.com".to_string())
            .set("password", "password".to_string());
        let columns = ColumnMap::new(&[("firstName", "first_name"), ("lastName", "last_name")]);

        let set = sql_for_partial_update(&data, &columns).unwrap();

        assert_eq!(
            set.to_sql(),
            r#""first_name" = $1, "last_name" = $2, "email" = $3, "password" = $4"#
        );
        assert_eq!(
            debug_values(&set),
            vec![
                r#""nathan""#,
                r#""irrelevant""#,
                r#""test@test.com""#,
                r#""password""#
            ]
        );
    }

    #[test]
    fn translates_company_fields() {
        let mut data = Patch::new();
        data.set("name", "fake".to_string())
            .set("description", "not real".to_string())
            .set("numEmployees", 20_i32)
            .set("logoUrl", "test.fakephoto.com".to_string());
        let columns = ColumnMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

        let set = sql_for_partial_update(&data, &columns).unwrap();

        assert_eq!(
            set.to_sql(),
            r#""name" = $1, "description" = $2, "num_employees" = $3, "logo_url" = $4"#
        );
        assert_eq!(set.param_count(), 4);
        assert_eq!(debug_values(&set)[2], "20");
    }

    #[test]
    fn empty_patch_is_bad_request_for_any_map() {
        let empty = Patch::new();
        for columns in [
            ColumnMap::identity(),
            ColumnMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]),
        ] {
            let err = sql_for_partial_update(&empty, &columns).unwrap_err();
            assert!(err.is_bad_request());
            assert_eq!(err.to_string(), "Bad request: No data");
        }
    }

    #[test]
    fn placeholder_count_matches_field_count() {
        for n in 1..=12 {
            let mut data = Patch::new();
            for i in 0..n {
                data.set(format!("field{i}"), i as i64);
            }

            let set = sql_for_partial_update(&data, &ColumnMap::identity()).unwrap();
            let rendered = set.to_sql();

            assert_eq!(set.param_count(), n);
            assert_eq!(rendered.matches('$').count(), n);
            for i in 0..n {
                let token = format!(r#""field{i}" = ${}"#, i + 1);
                assert!(rendered.contains(&token), "missing {token} in {rendered}");
                assert_eq!(format!("{:?}", set.params()[i]), i.to_string());
            }
        }
    }

    #[test]
    fn explicit_null_is_bound_not_skipped() {
        let mut data = Patch::new();
        data.set_null::<i32>("salary").set("equity", None::<String>);

        let set = sql_for_partial_update(&data, &ColumnMap::identity()).unwrap();

        assert_eq!(set.to_sql(), r#""salary" = $1, "equity" = $2"#);
        assert_eq!(debug_values(&set), vec!["None", "None"]);
    }

    #[test]
    fn resetting_a_field_keeps_its_position() {
        let mut data = Patch::new();
        data.set("title", "a".to_string())
            .set("salary", 1_i32)
            .set("title", "b".to_string());

        assert_eq!(data.len(), 2);
        assert_eq!(data.fields().collect::<Vec<_>>(), vec!["title", "salary"]);

        let set = sql_for_partial_update(&data, &ColumnMap::identity()).unwrap();
        assert_eq!(set.to_sql(), r#""title" = $1, "salary" = $2"#);
        assert_eq!(debug_values(&set), vec![r#""b""#, "1"]);
    }

    #[test]
    fn field_names_cannot_break_out_of_the_identifier() {
        let mut data = Patch::new();
        data.set(r#"title" = 'x', "salary"#, 1_i32);

        let set = sql_for_partial_update(&data, &ColumnMap::identity()).unwrap();
        assert_eq!(set.to_sql(), r#""title"" = 'x', ""salary" = $1"#);
    }

    #[test]
    fn contains_tracks_presence() {
        let mut data = Patch::new();
        data.set_null::<i32>("salary");
        assert!(data.contains("salary"));
        assert!(!data.contains("title"));
    }
}
