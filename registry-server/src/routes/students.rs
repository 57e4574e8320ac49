//! Student record endpoints.
//!
//! Thin handlers: extract, call the record service, shape the response.
//! Non-integer path ids are rejected with 400 by the typed `Path<i64>`
//! extractor before a handler runs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use registry_core::{Student, StudentPayload};

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring matched against name, surname, email,
    /// or id number. Empty or absent lists everything.
    pub q: Option<String>,
}

/// GET /api/students - list all records, or search with ?q=
async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Student>>> {
    let students = state.registry.list(params.q.as_deref()).await?;
    Ok(Json(students))
}

/// GET /api/students/{id} - fetch a single record
async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Student>> {
    let student = state.registry.get(id).await?;
    Ok(Json(student))
}

/// POST /api/students - register a new student
async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentPayload>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let student = state.registry.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// PUT /api/students/{id} - whole-record replace
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StudentPayload>,
) -> ApiResult<Json<Student>> {
    let student = state.registry.update(id, &payload).await?;
    Ok(Json(student))
}

/// DELETE /api/students/{id}
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.registry.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
