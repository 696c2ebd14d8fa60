//! # Car Rental API
//!
//! HTTP front-end for a small car rental fleet: register cars, rent them
//! out, take them back and accumulate mileage.
//!
//! ## Layers
//! ```text
//! ┌──────────────┐    ┌────────────────┐    ┌──────────────────┐
//! │ routes       │───►│ RentalService  │───►│ rental-db        │
//! │ (axum)       │    │ (rules, logs)  │    │ (SQLite, sqlx)   │
//! └──────┬───────┘    └───────┬────────┘    └──────────────────┘
//!        │                    │
//!        └──── ApiError ◄─────┘ ServiceError
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use service::{RentalService, ServiceError, ServiceResult};
