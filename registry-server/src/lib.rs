//! registry-server: HTTP transport for the student registry.
//!
//! Translates HTTP requests into [`registry_core::Registry`] calls and
//! domain errors back into status codes and JSON bodies. Also serves the
//! static browser pages from `public/`.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{create_router, run_server, AppState, ServerArgs};
