//! registry-core: domain library for the student registry.
//!
//! Holds everything below the HTTP boundary: the student record model,
//! the field-level validation layer, the SQLite-backed record store, and
//! the record service that orchestrates them. The HTTP crate
//! (registry-server) only translates requests into calls on [`Registry`]
//! and errors back into responses.

pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{FieldError, RegistryError, Result};
pub use models::{Student, StudentFields, StudentPayload};
pub use service::Registry;
pub use store::StudentStore;
