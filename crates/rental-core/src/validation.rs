//! # Validation Module
//!
//! Input validation for the rental operations.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (rental-api)                                    │
//! │  └── JSON deserialization (malformed body → 400)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: RentalService                                                │
//! │  └── THIS MODULE: field rules (empty, length, negative, overflow)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY on registration                                       │
//! │  └── CHECK (integer mileage >= 0)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::validation::{validate_registration, validate_kilometers};
//!
//! validate_registration("ABC123").unwrap();
//! assert!(validate_kilometers(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_MODEL_LEN, MAX_REGISTRATION_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a registration (licence plate).
///
/// ## Rules
/// - Must not be empty or blank
/// - At most 255 characters
///
/// Inner spaces are fine ("AB12 CDE"); clients percent-encode them in paths.
///
/// ## Example
/// ```rust
/// use rental_core::validation::validate_registration;
///
/// assert!(validate_registration("ABC123").is_ok());
/// assert!(validate_registration("AB12 CDE").is_ok());
/// assert!(validate_registration("").is_err());
/// ```
pub fn validate_registration(registration: &str) -> ValidationResult<()> {
    if registration.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "registration".to_string(),
        });
    }

    max_len("registration", registration, MAX_REGISTRATION_LEN)
}

/// Validates a model name: free text of at most 255 characters, may be empty.
pub fn validate_model(model: &str) -> ValidationResult<()> {
    max_len("model", model, MAX_MODEL_LEN)
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the baseline mileage supplied when a car is added.
pub fn validate_mileage(mileage: i64) -> ValidationResult<()> {
    non_negative("mileage", mileage)
}

/// Validates the distance driven during a rental.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (car returned without being driven)
pub fn validate_kilometers(kilometers: i64) -> ValidationResult<()> {
    non_negative("kilometers", kilometers)
}

/// Adds a rental's distance to the odometer.
///
/// ## Example
/// ```rust
/// use rental_core::validation::accumulate_mileage;
///
/// assert_eq!(accumulate_mileage(1000, 50).unwrap(), 1050);
/// assert!(accumulate_mileage(i64::MAX - 10, 100).is_err());
/// ```
pub fn accumulate_mileage(mileage: i64, kilometers: i64) -> ValidationResult<i64> {
    validate_kilometers(kilometers)?;

    mileage
        .checked_add(kilometers)
        .ok_or_else(|| ValidationError::TooLarge {
            field: "mileage".to_string(),
            max: i64::MAX,
        })
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
