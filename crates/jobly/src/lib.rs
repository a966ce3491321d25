//! # jobly
//!
//! The data layer of the jobly job board, on PostgreSQL.
//!
//! ## Features
//!
//! - **Parameter-safe SQL**: values are only ever bound through `$n`
//!   placeholders, numbered by [`Sql`] as fragments are composed
//! - **Partial updates**: [`sql_for_partial_update`] turns a presence-aware
//!   [`Patch`] into a `SET` list, translating external names through a
//!   [`ColumnMap`]
//! - **Optional filters**: [`sql_for_filter`] turns optional text/range
//!   criteria into a `WHERE` conjunction
//! - **Models**: [`Job`] composes both into create/get/find_all/update/remove
//! - **Transaction-friendly**: pass a transaction anywhere a
//!   [`GenericClient`] is expected
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{Job, JobFilter, JobPatch, NewJob};
//!
//! let pool = jobly::DatabaseConfig::from_env()?.create_pool()?;
//! let client = pool.get().await?;
//!
//! let job = Job::create(&client, &NewJob {
//!     title: "Engineer".into(),
//!     salary: Some(120_000),
//!     equity: None,
//!     company_handle: "acme".into(),
//! }).await?;
//!
//! let patch: JobPatch = serde_json::from_str(r#"{"salary": null}"#)?;
//! let job = Job::update(&client, job.id, &patch.to_patch()).await?;
//! let engineers = Job::find_all(&client, &JobFilter { title: Some("eng".into()), ..Default::default() }).await?;
//! Job::remove(&client, job.id).await?;
//! ```

pub mod changeset;
pub mod client;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod ident;
pub mod models;
pub mod partial_update;
pub mod row;
pub mod sql;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use client::GenericClient;
pub use columns::ColumnMap;
pub use config::DatabaseConfig;
pub use error::{ModelError, ModelResult};
pub use filter::{FilterColumns, RangeFilter, sql_for_filter};
pub use ident::Ident;
pub use models::{Job, JobFilter, JobPatch, NewJob};
pub use partial_update::{Patch, sql_for_partial_update};
pub use row::{FromRow, RowExt};
pub use sql::{Param, Sql, sql};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
