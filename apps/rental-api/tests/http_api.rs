//! End-to-end tests of the HTTP surface against an in-memory database.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rental_api::{router, RentalService};
use rental_db::{Database, DbConfig};

async fn app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (router(RentalService::new(db.clone())), db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn list_is_empty_initially() {
    let (app, _db) = app().await;
    let (status, body) = send_json(&app, "GET", "/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn civic_lifecycle() {
    let (app, _db) = app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Car added successfully", "id": "ABC123"}));

    let (status, body) = send_json(&app, "POST", "/cars/ABC123/rentals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Car rented successfully"}));

    let (status, body) = send_json(&app, "GET", "/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"model": "Civic", "registration": "ABC123", "mileage": 1000, "available": false}])
    );

    let (status, body) =
        send_json(&app, "POST", "/cars/ABC123/returns", Some(r#"{"kilometers":50}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Car returned successfully"}));

    let (status, body) = send_json(&app, "GET", "/cars/ABC123", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"model": "Civic", "registration": "ABC123", "mileage": 1050, "available": true})
    );
}

#[tokio::test]
async fn duplicate_add_is_bad_request() {
    let (app, _db) = app().await;
    let payload = r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#;

    send_json(&app, "POST", "/cars", Some(payload)).await;
    let (status, body) = send_json(&app, "POST", "/cars", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");

    let (_, list) = send_json(&app, "GET", "/cars", None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn mileage_defaults_to_zero() {
    let (app, _db) = app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Golf","registration":"KLM456"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, car) = send_json(&app, "GET", "/cars/KLM456", None).await;
    assert_eq!(car["mileage"], 0);
}

#[tokio::test]
async fn unknown_car_is_not_found() {
    let (app, _db) = app().await;

    let (status, body) = send_json(&app, "POST", "/cars/NOPE/rentals", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) =
        send_json(&app, "POST", "/cars/NOPE/returns", Some(r#"{"kilometers":5}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "GET", "/cars/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rent_twice_is_bad_request() {
    let (app, _db) = app().await;
    send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#),
    )
    .await;

    send_json(&app, "POST", "/cars/ABC123/rentals", None).await;
    let (status, body) = send_json(&app, "POST", "/cars/ABC123/rentals", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_RENTED");
}

#[tokio::test]
async fn return_without_rent_is_bad_request() {
    let (app, _db) = app().await;
    send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#),
    )
    .await;

    let (status, body) =
        send_json(&app, "POST", "/cars/ABC123/returns", Some(r#"{"kilometers":50}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_RENTED");
}

#[tokio::test]
async fn negative_kilometers_rejected() {
    let (app, _db) = app().await;
    send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#),
    )
    .await;
    send_json(&app, "POST", "/cars/ABC123/rentals", None).await;

    let (status, body) =
        send_json(&app, "POST", "/cars/ABC123/returns", Some(r#"{"kilometers":-5}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, car) = send_json(&app, "GET", "/cars/ABC123", None).await;
    assert_eq!(car["mileage"], 1000);
    assert_eq!(car["available"], false);
}

#[tokio::test]
async fn malformed_bodies_are_bad_request() {
    let (app, _db) = app().await;

    let (status, body) = send_json(&app, "POST", "/cars", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(!body["message"].as_str().unwrap_or_default().is_empty());

    let (status, _) = send_json(&app, "POST", "/cars", Some(r#"{"model":"Civic"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Civic","registration":"ABC123","mileage":1000}"#),
    )
    .await;
    send_json(&app, "POST", "/cars/ABC123/rentals", None).await;

    let (status, body) =
        send_json(&app, "POST", "/cars/ABC123/returns", Some(r#"{"kilometers":"far"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn health_reports_database_state() {
    let (app, db) = app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    db.close().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn storage_failure_is_internal_error() {
    let (app, db) = app().await;
    db.close().await;

    let (status, body) = send_json(&app, "GET", "/cars", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn registration_with_space_is_routable() {
    let (app, _db) = app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"Focus","registration":"AB12 CDE","mileage":0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "AB12 CDE");

    let (status, _) = send_json(&app, "POST", "/cars/AB12%20CDE/rentals", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send_json(&app, "POST", "/cars/AB12%20CDE/returns", Some(r#"{"kilometers":12}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, car) = send_json(&app, "GET", "/cars/AB12%20CDE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        car,
        json!({"model": "Focus", "registration": "AB12 CDE", "mileage": 12, "available": true})
    );
}

#[tokio::test]
async fn empty_model_is_accepted() {
    let (app, _db) = app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/cars",
        Some(r#"{"model":"","registration":"XYZ789"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn return_overflowing_mileage_is_rejected() {
    let (app, _db) = app().await;
    let payload = format!(
        r#"{{"model":"Civic","registration":"BIG1","mileage":{}}}"#,
        i64::MAX - 10
    );
    send_json(&app, "POST", "/cars", Some(&payload)).await;
    send_json(&app, "POST", "/cars/BIG1/rentals", None).await;

    let (status, body) =
        send_json(&app, "POST", "/cars/BIG1/returns", Some(r#"{"kilometers":100}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, list) = send_json(&app, "GET", "/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["mileage"], i64::MAX - 10);
    assert_eq!(list[0]["available"], false);
}
