//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                        │
//! │  ├── CoreError        - Rental rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rental-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rental-api errors (app)                                               │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                         DbError ────┴─► ServiceError → ApiError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Rental rule violations.
///
/// Each variant is a caller-visible failure; none of them is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No car is registered under this registration.
    #[error("Car not found: {0}")]
    CarNotFound(String),

    /// A car with this registration already exists.
    #[error("Car with registration '{0}' already exists")]
    DuplicateRegistration(String),

    /// Rent was requested for a car that is already out.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /cars/ABC123/rentals   (car available)  → 200
    /// POST /cars/ABC123/rentals   (car rented)     → AlreadyRented → 400
    /// ```
    #[error("Car {0} is already rented")]
    AlreadyRented(String),

    /// Return was requested for a car that is not out.
    #[error("Car {0} is not marked as rented")]
    NotRented(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before any storage call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Numeric value would exceed what a mileage counter can hold.
    #[error("{field} would exceed the maximum of {max}")]
    TooLarge { field: String, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
