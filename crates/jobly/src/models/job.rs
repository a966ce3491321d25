//! The `jobs` table.
//!
//! Every operation is a single statement against the store. Rows are always
//! returned in external shape: camelCase names and `equity` as a decimal
//! string.

use super::double_option;
use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::client::GenericClient;
use crate::columns::ColumnMap;
use crate::error::{ModelError, ModelResult};
use crate::filter::{FilterColumns, RangeFilter, sql_for_filter};
use crate::ident::Ident;
use crate::partial_update::{Patch, sql_for_partial_update};
use crate::row::{FromRow, RowExt};
use crate::sql::{Sql, sql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Max length of a company handle (`VARCHAR(25)`).
const HANDLE_MAX_LEN: usize = 25;

/// A persisted job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

impl Job {
    pub const TABLE: &'static str = "jobs";

    /// External -> storage names for job fields.
    pub const COLUMNS: ColumnMap = ColumnMap::new(&[("companyHandle", "company_handle")]);

    /// External field names, in the order rows are selected.
    pub const FIELDS: [&'static str; 5] = ["id", "title", "salary", "equity", "companyHandle"];

    /// Fields that can't be changed after creation.
    pub const IMMUTABLE: [&'static str; 2] = ["id", "companyHandle"];

    /// Columns searched by [`JobFilter`].
    pub const FILTER: FilterColumns = FilterColumns::new("title", "salary");

    fn table() -> ModelResult<Ident> {
        Ident::quoted(Self::TABLE)
    }

    fn id_column() -> ModelResult<Ident> {
        Ident::quoted(Self::COLUMNS.storage_name("id"))
    }

    fn returning() -> ModelResult<String> {
        Self::COLUMNS.select_list(&Self::FIELDS)
    }

    fn not_found(id: i32) -> ModelError {
        tracing::debug!(target: "jobly.model", table = Self::TABLE, id, "no matching row");
        ModelError::not_found(format!("No job: {id}"))
    }

    /// Create a job and return it with its generated id.
    ///
    /// No duplicate detection beyond the table's own constraints; an unknown
    /// `companyHandle` surfaces as the store's foreign key error.
    pub async fn create(conn: &impl GenericClient, input: &NewJob) -> ModelResult<Job> {
        let fields = input.to_patch();

        let mut q = sql("INSERT INTO ");
        q.tag("jobs.create");
        q.push_ident(&Self::table()?).push(" (");
        let mut values = Sql::empty();
        for (i, (field, value)) in fields.iter().enumerate() {
            if i > 0 {
                q.push(", ");
                values.push(", ");
            }
            q.push_ident(&Ident::quoted(Self::COLUMNS.storage_name(field))?);
            values.push_bind_value(value.clone());
        }
        q.push(") VALUES (");
        q.push_sql(values);
        q.push(") RETURNING ").push(&Self::returning()?);

        match q.fetch_opt_as::<Job>(conn).await? {
            Some(job) => Ok(job),
            None => Err(ModelError::decode("id", "INSERT ... RETURNING returned no row")),
        }
    }

    /// Fetch one job by id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> ModelResult<Job> {
        let mut q = sql("SELECT ");
        q.tag("jobs.get");
        q.push(&Self::returning()?)
            .push(" FROM ")
            .push_ident(&Self::table()?)
            .push(" WHERE ")
            .push_ident(&Self::id_column()?)
            .push(" = ")
            .push_bind(id);

        q.fetch_opt_as(conn).await?.ok_or_else(|| Self::not_found(id))
    }

    /// List jobs matching `filter`; an empty filter lists every job.
    ///
    /// Result order is whatever the store returns.
    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> ModelResult<Vec<Job>> {
        let mut cond = sql_for_filter(&filter.criteria(), &Self::FILTER)?;
        if filter.has_equity == Some(true) {
            if !cond.is_empty() {
                cond.push(" AND ");
            }
            cond.push_ident(&Ident::quoted("equity")?).push(" > 0");
        }

        let mut q = sql("SELECT ");
        q.tag("jobs.find_all");
        q.push(&Self::returning()?)
            .push(" FROM ")
            .push_ident(&Self::table()?);
        if !cond.is_empty() {
            q.push(" WHERE ").push_sql(cond);
        }

        q.fetch_all_as(conn).await
    }

    /// Apply a partial update and return the updated job.
    ///
    /// Only the fields present in `patch` change; a field set to null is
    /// cleared. An empty patch, or one touching `id`/`companyHandle`, is
    /// rejected before any statement is issued.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: &Patch) -> ModelResult<Job> {
        if let Some(field) = Self::IMMUTABLE.iter().find(|f| patch.contains(f)) {
            return Err(ModelError::bad_request(format!("{field} cannot be changed")));
        }
        let set = sql_for_partial_update(patch, &Self::COLUMNS)?;

        let mut q = sql("UPDATE ");
        q.tag("jobs.update");
        q.push_ident(&Self::table()?).push(" SET ");
        q.push_sql(set);
        q.push(" WHERE ")
            .push_ident(&Self::id_column()?)
            .push(" = ")
            .push_bind(id);
        q.push(" RETURNING ").push(&Self::returning()?);

        q.fetch_opt_as(conn).await?.ok_or_else(|| Self::not_found(id))
    }

    /// Delete a job.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> ModelResult<()> {
        let mut q = sql("DELETE FROM ");
        q.tag("jobs.remove");
        q.push_ident(&Self::table()?)
            .push(" WHERE ")
            .push_ident(&Self::id_column()?)
            .push(" = ")
            .push_bind(id);

        match q.execute(conn).await? {
            0 => Err(Self::not_found(id)),
            _ => Ok(()),
        }
    }
}

/// Payload for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    #[serde(alias = "company_handle")]
    pub company_handle: String,
}

impl NewJob {
    /// Field values keyed by external name, in insert order.
    pub fn to_patch(&self) -> Patch {
        let mut fields = Patch::new();
        fields
            .set("title", self.title.clone())
            .set("salary", self.salary)
            .set("equity", self.equity)
            .set("companyHandle", self.company_handle.clone());
        fields
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::default();
        check_title(&mut errs, &self.title);
        check_salary(&mut errs, self.salary);
        check_equity(&mut errs, self.equity);

        let handle_len = self.company_handle.chars().count();
        if handle_len == 0 {
            errs.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Required,
                "companyHandle must not be empty",
            ));
        } else if handle_len > HANDLE_MAX_LEN {
            errs.push(
                ValidationError::new(
                    "companyHandle",
                    ValidationCode::Len,
                    format!("companyHandle must be at most {HANDLE_MAX_LEN} characters"),
                )
                .with_metadata("max", HANDLE_MAX_LEN),
            );
        }
        errs
    }
}

/// Payload for [`Job::update`].
///
/// `salary` and `equity` are tri-state: absent leaves the column alone,
/// `null` clears it, a value sets it. `id` and `companyHandle` are not
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    /// Only the fields that were supplied, in declaration order.
    pub fn to_patch(&self) -> Patch {
        let mut fields = Patch::new();
        if let Some(title) = &self.title {
            fields.set("title", title.clone());
        }
        if let Some(salary) = self.salary {
            fields.set("salary", salary);
        }
        if let Some(equity) = self.equity {
            fields.set("equity", equity);
        }
        fields
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::default();
        if let Some(title) = &self.title {
            check_title(&mut errs, title);
        }
        check_salary(&mut errs, self.salary.flatten());
        check_equity(&mut errs, self.equity.flatten());
        errs
    }
}

/// Query-string filter for [`Job::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<i32>,
    #[serde(default)]
    pub max_salary: Option<i32>,
    /// `true` keeps only jobs with non-zero equity; `false` is no filter.
    #[serde(default)]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    fn criteria(&self) -> RangeFilter<i32> {
        RangeFilter {
            text_match: self.title.clone(),
            min: self.min_salary,
            max: self.max_salary,
        }
    }
}

fn check_title(errs: &mut ValidationErrors, title: &str) {
    if title.trim().is_empty() {
        errs.push(ValidationError::new(
            "title",
            ValidationCode::Required,
            "title must not be empty",
        ));
    }
}

fn check_salary(errs: &mut ValidationErrors, salary: Option<i32>) {
    if let Some(salary) = salary {
        if salary < 0 {
            errs.push(
                ValidationError::new("salary", ValidationCode::Range, "salary must be >= 0")
                    .with_metadata("min", 0),
            );
        }
    }
}

fn check_equity(errs: &mut ValidationErrors, equity: Option<Decimal>) {
    if let Some(equity) = equity {
        if equity < Decimal::ZERO || equity > Decimal::ONE {
            errs.push(
                ValidationError::new(
                    "equity",
                    ValidationCode::Range,
                    "equity must be between 0 and 1",
                )
                .with_metadata("min", 0)
                .with_metadata("max", 1),
            );
        }
    }
}
