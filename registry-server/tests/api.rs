//! End-to-end API tests: the real router over an in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use registry_core::{Registry, StudentStore};
use registry_server::create_router;

async fn test_app() -> Router {
    let store = StudentStore::connect_in_memory().await.unwrap();
    create_router(Registry::new(store), std::path::Path::new("public"))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn jane() -> Value {
    json!({
        "name": "Jane",
        "surname": "Doe",
        "email": "J@X.com",
        "phone": "0123456789",
        "id_number": "1234567890123",
        "course": "CS"
    })
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = test_app().await;
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn full_record_lifecycle() {
    let app = test_app().await;

    // Create: 201, normalized email, fresh id, equal timestamps.
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", jane()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["email"], "j@x.com");
    let id = created["id"].as_i64().unwrap();
    assert!(id >= 1);
    assert_eq!(created["address"], "");
    assert_eq!(created["created_at"], created["updated_at"]);

    // Same id_number under a different email: 409.
    let mut duplicate = jane();
    duplicate["email"] = json!("other@x.com");
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", duplicate))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("already"));

    // Update the course: 200, updated_at moved, identity unchanged.
    let mut changed = jane();
    changed["course"] = json!("Math");
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/students/{id}"),
            changed,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["course"], "Math");
    assert_eq!(updated["id_number"], "1234567890123");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&created["updated_at"]));

    // Delete: 200 with a success flag.
    let response = app
        .clone()
        .oneshot(delete(&format!("/api/students/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    // Gone now.
    let response = app
        .oneshot(get(&format!("/api/students/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = test_app().await;
    let response = app
        .oneshot(json_request(Method::POST, "/api/students", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        ["name", "surname", "email", "phone", "id_number", "course"]
    );
    assert!(errors.iter().all(|e| e["message"].is_string()));
}

#[tokio::test]
async fn duplicate_email_conflicts_across_case() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", jane()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut recased = jane();
    recased["email"] = json!("j@x.COM");
    recased["id_number"] = json!("9999999999999");
    let response = app
        .oneshot(json_request(Method::POST, "/api/students", recased))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_keeping_own_identity_succeeds() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", jane()))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();

    let mut changed = jane();
    changed["address"] = json!("1 New Street");
    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/students/{id}"),
            changed,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["address"], "1 New Street");
}

#[tokio::test]
async fn non_integer_id_is_rejected() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(get("/api/students/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(delete("/api/students/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_rejects_non_positive_id() {
    let app = test_app().await;
    let response = app
        .oneshot(json_request(Method::PUT, "/api/students/0", jane()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "id");
}

#[tokio::test]
async fn list_and_search_students() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", jane()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let john = json!({
        "name": "John",
        "surname": "Smith",
        "email": "john@x.com",
        "phone": "0987654321",
        "id_number": "3210987654321",
        "course": "Math"
    });
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", john))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Empty query: everything, newest first.
    let response = app.clone().oneshot(get("/api/students")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all = body_json(response).await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["John", "Jane"]);

    // Substring search, case-insensitive, across fields.
    let response = app
        .clone()
        .oneshot(get("/api/students?q=SMITH"))
        .await
        .unwrap();
    let hits = body_json(response).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["surname"], "Smith");

    let response = app.oneshot(get("/api/students?q=32109")).await.unwrap();
    let hits = body_json(response).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "John");
}

#[tokio::test]
async fn delete_twice_returns_not_found_second_time() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/students", jane()))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/students/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(delete(&format!("/api/students/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Student not found");
}
