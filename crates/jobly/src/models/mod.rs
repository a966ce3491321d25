//! Entity models.

pub mod job;

pub use job::{Job, JobFilter, JobPatch, NewJob};

use serde::{Deserialize, Deserializer};

/// Deserialize a tri-state field: absent -> `None` (via `#[serde(default)]`),
/// `null` -> `Some(None)`, value -> `Some(Some(value))`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
