//! Record service: orchestrates validation, uniqueness pre-checks, and
//! store operations for every registry operation.
//!
//! Uniqueness is checked with a read before the write so that a duplicate
//! email or id number comes back as a uniform, user-facing conflict
//! instead of a raw storage error. The read-then-write pair is inherently
//! racy under concurrent identical submissions; the store's unique
//! constraints close that gap (see [`crate::store`]).

use crate::error::{FieldError, RegistryError, Result};
use crate::models::{Student, StudentPayload};
use crate::store::StudentStore;
use crate::validate;

/// The record service. Owns a [`StudentStore`] handle injected at
/// construction, which keeps it testable against an in-memory store.
#[derive(Clone)]
pub struct Registry {
    store: StudentStore,
}

impl Registry {
    pub fn new(store: StudentStore) -> Self {
        Self { store }
    }

    /// All records newest first; a non-empty query narrows to
    /// case-insensitive substring matches on name, surname, email, or id
    /// number.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Student>> {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => self.store.search(q).await,
            _ => self.store.list().await,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        self.store
            .get(id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Validate, pre-check uniqueness, insert. Returns the stored record
    /// with its generated id and timestamps.
    pub async fn create(&self, payload: &StudentPayload) -> Result<Student> {
        let fields = validate::validate(payload).map_err(RegistryError::Validation)?;

        if self
            .store
            .conflict_exists(&fields.email, &fields.id_number, None)
            .await?
        {
            return Err(RegistryError::Conflict(
                "Email or ID number already exists".to_owned(),
            ));
        }

        self.store.insert(&fields).await
    }

    /// Whole-record replace. The uniqueness pre-check excludes the record
    /// itself, so keeping the current email or id number is not a
    /// conflict.
    pub async fn update(&self, id: i64, payload: &StudentPayload) -> Result<Student> {
        let mut errors = Vec::new();
        if id < 1 {
            errors.push(FieldError::new("id", "Id must be a positive integer"));
        }

        let fields = match validate::validate(payload) {
            Ok(fields) if errors.is_empty() => fields,
            Ok(_) => return Err(RegistryError::Validation(errors)),
            Err(mut field_errors) => {
                errors.append(&mut field_errors);
                return Err(RegistryError::Validation(errors));
            }
        };

        if self
            .store
            .conflict_exists(&fields.email, &fields.id_number, Some(id))
            .await?
        {
            return Err(RegistryError::Conflict(
                "Email or ID number already used by another student".to_owned(),
            ));
        }

        self.store
            .update(id, &fields)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(RegistryError::NotFound(id))
        }
    }
}
