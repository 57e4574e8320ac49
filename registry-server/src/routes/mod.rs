//! Route modules for the registry API.

use axum::Router;

use crate::server::AppState;

pub mod health;
pub mod students;

/// All API routes, mounted under `/api` by the server.
pub fn router() -> Router<AppState> {
    Router::new().merge(health::router()).merge(students::router())
}
