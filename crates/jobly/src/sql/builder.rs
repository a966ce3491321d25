use super::Param;
use crate::client::GenericClient;
use crate::error::{ModelError, ModelResult};
use crate::ident::Ident;
use crate::row::FromRow;
use std::fmt::Write;
use std::sync::Arc;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug)]
enum SqlPart {
    Raw(String),
    Param,
}

/// A parameter-safe dynamic SQL builder.
///
/// Every placeholder is appended together with its value, so `$n` in
/// [`Sql::to_sql`] always binds to the `n`-th entry of [`Sql::params`].
#[must_use]
#[derive(Debug)]
pub struct Sql {
    parts: Vec<SqlPart>,
    params: Vec<Param>,
    tag: Option<String>,
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial_sql.into());
        sql
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: Vec::new(),
            tag: None,
        }
    }

    /// Associate a tag, reported as `op` in the SQL debug log.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tag = Some(tag.into());
        self
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_bind_value(Arc::new(value))
    }

    /// Append a parameter placeholder bound to an already type-erased value.
    pub fn push_bind_value(&mut self, value: Param) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value);
        self
    }

    /// Append another `Sql` fragment, consuming it.
    ///
    /// The fragment's placeholders continue this builder's numbering.
    pub fn push_sql(&mut self, mut other: Sql) -> &mut Self {
        for part in other.parts.drain(..) {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                SqlPart::Param => self.parts.push(SqlPart::Param),
            }
        }
        self.params.append(&mut other.params);
        if self.tag.is_none() {
            self.tag = other.tag;
        }
        self
    }

    /// Append a quoted identifier.
    ///
    /// Postgres does not allow parameterizing identifiers, so they are
    /// written inline, quoted and escaped by [`Ident`].
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => ident.write_sql(last),
            _ => {
                let mut s = String::new();
                ident.write_sql(&mut s);
                self.parts.push(SqlPart::Raw(s));
            }
        }
        self
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// `true` if no text and no placeholders have been added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn validate(&self) -> ModelResult<()> {
        let placeholder_count = self
            .parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Param))
            .count();

        if placeholder_count != self.params.len() {
            return Err(ModelError::Validation(format!(
                "Sql: placeholders({}) do not match params({})",
                placeholder_count,
                self.params.len()
            )));
        }
        Ok(())
    }

    fn prepare(&self) -> ModelResult<String> {
        self.validate()?;
        let sql = self.to_sql();
        tracing::debug!(
            target: "jobly.sql",
            op = self.tag.as_deref().unwrap_or("-"),
            param_count = self.params.len(),
            sql = %sql,
        );
        Ok(sql)
    }

    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> ModelResult<Vec<Row>> {
        let sql = self.prepare()?;
        let params = self.params_ref();
        conn.query(&sql, &params).await
    }

    /// Execute the built SQL and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> ModelResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the built SQL and return at most one row.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> ModelResult<Option<Row>> {
        let sql = self.prepare()?;
        let params = self.params_ref();
        conn.query_opt(&sql, &params).await
    }

    /// Execute the built SQL and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> ModelResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the built SQL and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> ModelResult<u64> {
        let sql = self.prepare()?;
        let params = self.params_ref();
        conn.execute(&sql, &params).await
    }
}
