//! # HTTP Routes
//!
//! ```text
//! GET  /cars                          → list_cars
//! POST /cars                          → add_car
//! GET  /cars/{registration}           → find_car
//! POST /cars/{registration}/rentals   → rent_car
//! POST /cars/{registration}/returns   → return_car
//! GET  /health                        → health
//! ```
//!
//! Request bodies are decoded as JSON whatever their `Content-Type`; a body
//! that does not decode is rejected with 400 and the decoder's message.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use rental_core::CarView;

use crate::error::ApiError;
use crate::service::RentalService;

/// Builds the application router.
pub fn router(service: RentalService) -> Router {
    Router::new()
        .route("/cars", get(list_cars).post(add_car))
        .route("/cars/{registration}", get(find_car))
        .route("/cars/{registration}/rentals", post(rent_car))
        .route("/cars/{registration}/returns", post(return_car))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddCarRequest {
    pub model: String,
    pub registration: String,
    #[serde(default)]
    pub mileage: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReturnCarRequest {
    pub kilometers: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    fn new(message: &'static str) -> Self {
        MessageResponse { message, id: None }
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_cars(State(service): State<RentalService>) -> Result<Json<Vec<CarView>>, ApiError> {
    Ok(Json(service.list_cars().await?))
}

async fn add_car(
    State(service): State<RentalService>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let req: AddCarRequest = parse_body(&body)?;
    let id = service
        .add_car(&req.model, &req.registration, req.mileage)
        .await?;

    Ok(Json(MessageResponse {
        message: "Car added successfully",
        id: Some(id),
    }))
}

async fn find_car(
    State(service): State<RentalService>,
    Path(registration): Path<String>,
) -> Result<Json<CarView>, ApiError> {
    Ok(Json(service.find_car(&registration).await?))
}

async fn rent_car(
    State(service): State<RentalService>,
    Path(registration): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.rent_car(&registration).await?;
    Ok(Json(MessageResponse::new("Car rented successfully")))
}

async fn return_car(
    State(service): State<RentalService>,
    Path(registration): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let req: ReturnCarRequest = parse_body(&body)?;
    service.return_car(&registration, req.kilometers).await?;
    Ok(Json(MessageResponse::new("Car returned successfully")))
}

async fn health(State(service): State<RentalService>) -> impl IntoResponse {
    if service.database().health_check().await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}
