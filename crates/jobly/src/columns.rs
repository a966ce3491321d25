//! External <-> storage column name translation.
//!
//! API callers use camelCase field names (`companyHandle`) while the tables use
//! snake_case columns (`company_handle`). Each model declares one static
//! [`ColumnMap`] and passes it into the clause builders; names missing from the
//! map are the same in both conventions.

use crate::error::ModelResult;
use crate::ident::Ident;

/// An immutable external -> storage name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    /// Build a map from `(external, storage)` pairs.
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    /// A map where every name passes through unchanged.
    pub const fn identity() -> Self {
        Self { pairs: &[] }
    }

    /// Storage column for an external field name.
    pub fn storage_name<'a>(&self, external: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(ext, _)| *ext == external)
            .map_or(external, |&(_, storage)| storage)
    }

    /// External field name for a storage column.
    pub fn external_name<'a>(&self, storage: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(_, col)| *col == storage)
            .map_or(storage, |&(external, _)| external)
    }

    /// Render a SELECT/RETURNING list for the given external fields.
    ///
    /// Translated fields are aliased back to their external name, so rows are
    /// always read by external name: `"company_handle" AS "companyHandle"`.
    pub fn select_list(&self, fields: &[&str]) -> ModelResult<String> {
        let mut out = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let storage = self.storage_name(field);
            out.push_str(&Ident::quoted(storage)?.to_sql());
            if storage != *field {
                out.push_str(" AS ");
                out.push_str(&Ident::quoted(field)?.to_sql());
            }
        }
        Ok(out)
    }
}
