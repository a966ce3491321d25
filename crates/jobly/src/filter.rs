//! Optional text-match + numeric-range WHERE clauses.
//!
//! [`sql_for_filter`] covers the common list-endpoint pattern of "name
//! contains X, count between A and B": every criterion is optional and only the
//! present ones become conjuncts.
//!
//! ```ignore
//! use jobly::{FilterColumns, RangeFilter, sql, sql_for_filter};
//!
//! const COMPANY_FILTER: FilterColumns = FilterColumns::new("name", "num_employees");
//!
//! let criteria = RangeFilter { text_match: Some("net".into()), min: Some(10), max: None };
//! let cond = sql_for_filter(&criteria, &COMPANY_FILTER)?;
//!
//! let mut q = sql("SELECT handle, name FROM companies");
//! if !cond.is_empty() {
//!     q.push(" WHERE ").push_sql(cond);
//! }
//! // SELECT handle, name FROM companies WHERE "name" ILIKE $1 AND "num_employees" >= $2
//! ```

use crate::error::{ModelError, ModelResult};
use crate::ident::Ident;
use crate::sql::Sql;
use serde::Deserialize;
use tokio_postgres::types::ToSql;

/// Filter criteria; `None` means "don't filter on this".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeFilter<N> {
    /// Case-insensitive substring to look for in the text column.
    #[serde(default)]
    pub text_match: Option<String>,
    /// Inclusive lower bound on the range column.
    #[serde(default)]
    pub min: Option<N>,
    /// Inclusive upper bound on the range column.
    #[serde(default)]
    pub max: Option<N>,
}

impl<N> Default for RangeFilter<N> {
    fn default() -> Self {
        Self {
            text_match: None,
            min: None,
            max: None,
        }
    }
}

impl<N> RangeFilter<N> {
    pub fn is_empty(&self) -> bool {
        self.text_match.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// Storage columns a [`RangeFilter`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterColumns {
    pub text: &'static str,
    pub range: &'static str,
}

impl FilterColumns {
    pub const fn new(text: &'static str, range: &'static str) -> Self {
        Self { text, range }
    }
}

/// Build the conjunction for `criteria` (without the `WHERE` keyword).
///
/// Conjuncts come out in a fixed order: text match, lower bound, upper bound.
/// With no criteria the result is an empty fragment with no values; callers
/// must then leave out `WHERE` entirely.
///
/// Fails with [`ModelError::BadRequest`] when both bounds are given and
/// `min > max`.
pub fn sql_for_filter<N>(criteria: &RangeFilter<N>, columns: &FilterColumns) -> ModelResult<Sql>
where
    N: PartialOrd + ToSql + Clone + Sync + Send + 'static,
{
    if let (Some(min), Some(max)) = (&criteria.min, &criteria.max) {
        if min > max {
            return Err(ModelError::bad_request("min must not exceed max"));
        }
    }

    let mut cond = Sql::empty();

    if let Some(text) = &criteria.text_match {
        push_and(&mut cond);
        cond.push_ident(&Ident::quoted(columns.text)?)
            .push(" ILIKE ")
            .push_bind(format!("%{text}%"));
    }
    if let Some(min) = &criteria.min {
        push_and(&mut cond);
        cond.push_ident(&Ident::quoted(columns.range)?)
            .push(" >= ")
            .push_bind(min.clone());
    }
    if let Some(max) = &criteria.max {
        push_and(&mut cond);
        cond.push_ident(&Ident::quoted(columns.range)?)
            .push(" <= ")
            .push_bind(max.clone());
    }

    Ok(cond)
}

fn push_and(cond: &mut Sql) {
    if !cond.is_empty() {
        cond.push(" AND ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPANIES: FilterColumns = FilterColumns::new("name", "num_employees");

    fn debug_values(sql: &Sql) -> Vec<String> {
        sql.params().iter().map(|v| format!("{v:?}")).collect()
    }

    #[test]
    fn no_criteria_builds_nothing() {
        let cond = sql_for_filter(&RangeFilter::<i32>::default(), &COMPANIES).unwrap();
        assert!(cond.is_empty());
        assert_eq!(cond.to_sql(), "");
        assert!(cond.params().is_empty());
    }

    #[test]
    fn all_criteria_in_fixed_order() {
        let criteria = RangeFilter {
            text_match: Some("test".to_string()),
            min: Some(2),
            max: Some(3),
        };
        let cond = sql_for_filter(&criteria, &COMPANIES).unwrap();

        assert_eq!(
            cond.to_sql(),
            r#""name" ILIKE $1 AND "num_employees" >= $2 AND "num_employees" <= $3"#
        );
        assert_eq!(debug_values(&cond), vec![r#""%test%""#, "2", "3"]);
        assert_eq!(cond.to_sql().matches(" AND ").count(), 2);
    }

    #[test]
    fn min_above_max_is_bad_request() {
        let criteria = RangeFilter {
            text_match: None,
            min: Some(5),
            max: Some(2),
        };
        let err = sql_for_filter(&criteria, &COMPANIES).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "Bad request: min must not exceed max");
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let criteria = RangeFilter {
            text_match: None,
            min: Some(4),
            max: Some(4),
        };
        let cond = sql_for_filter(&criteria, &COMPANIES).unwrap();
        assert_eq!(
            cond.to_sql(),
            r#""num_employees" >= $1 AND "num_employees" <= $2"#
        );
    }

    #[test]
    fn single_criteria_have_no_connector() {
        let only_max = RangeFilter {
            max: Some(100),
            ..RangeFilter::default()
        };
        let cond = sql_for_filter(&only_max, &COMPANIES).unwrap();
        assert_eq!(cond.to_sql(), r#""num_employees" <= $1"#);
        assert_eq!(debug_values(&cond), vec!["100"]);

        let only_text = RangeFilter::<i32> {
            text_match: Some("net".to_string()),
            ..RangeFilter::default()
        };
        let cond = sql_for_filter(&only_text, &COMPANIES).unwrap();
        assert_eq!(cond.to_sql(), r#""name" ILIKE $1"#);
    }

    #[test]
    fn text_match_wildcards_live_in_the_value() {
        let criteria = RangeFilter::<i32> {
            text_match: Some("x' OR '1'='1".to_string()),
            ..RangeFilter::default()
        };
        let cond = sql_for_filter(&criteria, &COMPANIES).unwrap();
        let rendered = cond.to_sql();
        assert!(!rendered.contains('%'));
        assert!(!rendered.contains("OR"));
        assert_eq!(debug_values(&cond), vec![r#""%x' OR '1'='1%""#]);
    }

    #[test]
    fn composes_after_a_select() {
        let criteria = RangeFilter {
            text_match: None,
            min: Some(10_i64),
            max: None,
        };
        let cond = sql_for_filter(&criteria, &COMPANIES).unwrap();

        let mut q = crate::sql::sql("SELECT handle FROM companies WHERE ");
        q.push_bind(true).push(" AND ");
        q.push_sql(cond);
        assert_eq!(
            q.to_sql(),
            r#"SELECT handle FROM companies WHERE $1 AND "num_employees" >= $2"#
        );
    }

    #[test]
    fn deserializes_partial_criteria() {
        let criteria: RangeFilter<i32> = serde_json::from_str(r#"{"min": 3}"#).unwrap();
        assert_eq!(
            criteria,
            RangeFilter {
                text_match: None,
                min: Some(3),
                max: None
            }
        );
        assert!(!criteria.is_empty());
        assert!(RangeFilter::<i32>::default().is_empty());
    }
}
