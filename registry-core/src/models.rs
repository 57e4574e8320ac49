//! Record and payload models for the student registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted student record.
///
/// `id`, `created_at`, and `updated_at` are owned by the store: callers
/// never set them, and `updated_at` moves on every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub course: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-submitted create/update payload.
///
/// Missing fields deserialize to empty strings so they fall through to
/// the "required" validation rules instead of failing at the JSON layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub course: String,
    pub address: Option<String>,
}

/// Validated, normalized column values ready for the store.
///
/// Produced only by [`crate::validate::validate`]; the trimming and email
/// normalization promised by the validation layer have already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub course: String,
    pub address: String,
}
