//! Quoted SQL identifiers.
//!
//! Storage names are always emitted as quoted identifiers so reserved words
//! (`"order"`) and mixed case (`"companyHandle"`) survive. Any character except
//! NUL is allowed; an embedded `"` is escaped as `""`.
//!
//! # Example
//! ```ignore
//! use jobly::Ident;
//!
//! let col = Ident::quoted("company_handle")?;
//! assert_eq!(col.to_sql(), r#""company_handle""#);
//! # Ok::<(), jobly::ModelError>(())
//! ```

use crate::error::{ModelError, ModelResult};
use std::fmt;

/// A single quoted SQL identifier (column or table name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> ModelResult<Self> {
        if name.is_empty() {
            return Err(ModelError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(ModelError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// The unquoted name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.0.chars() {
            if ch == '"' {
                out.push('"');
                out.push('"');
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
