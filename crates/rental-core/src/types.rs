//! # Domain Types
//!
//! Core domain types for the car rental service.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Car        │   │     CarView     │   │   RentalState   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  registration   │──►│  model          │   │  Available      │       │
//! │  │  model          │   │  registration   │   │  Rented         │       │
//! │  │  mileage        │   │  mileage        │   └─────────────────┘       │
//! │  │  available      │   │  available      │                             │
//! │  │  created_at     │   └─────────────────┘                             │
//! │  │  updated_at     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registration is the only identity a car has. It is immutable once
//! the car is created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Car
// =============================================================================

/// A rentable car as persisted in the `cars` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    /// Licence plate, primary key.
    pub registration: String,

    /// Free-text model name, set at creation.
    pub model: String,

    /// Odometer reading in kilometers. Only grows, and only on return.
    pub mileage: i64,

    /// `true` while the car can be rented.
    pub available: bool,

    /// When the car was registered.
    pub created_at: DateTime<Utc>,

    /// When the car last changed state.
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Creates a freshly registered car. New cars are always available.
    pub fn new(
        registration: impl Into<String>,
        model: impl Into<String>,
        mileage: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Car {
            registration: registration.into(),
            model: model.into(),
            mileage,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the rental state derived from the availability flag.
    #[inline]
    pub fn state(&self) -> RentalState {
        RentalState::from_available(self.available)
    }
}

// =============================================================================
// Car View
// =============================================================================

/// Public projection of a car, as returned by `GET /cars`.
///
/// ## JSON Shape
/// ```json
/// { "model": "Civic", "registration": "ABC123", "mileage": 1050, "available": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarView {
    pub model: String,
    pub registration: String,
    pub mileage: i64,
    pub available: bool,
}

impl From<Car> for CarView {
    fn from(car: Car) -> Self {
        CarView {
            model: car.model,
            registration: car.registration,
            mileage: car.mileage,
            available: car.available,
        }
    }
}

// =============================================================================
// Rental State
// =============================================================================

/// The two-state lifecycle every car cycles through.
///
/// ## State Machine
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │   (created) ──► Available ──── rent ────► Rented                        │
/// │                     ▲                       │                           │
/// │                     └──── return(km >= 0) ──┘   mileage += km           │
/// │                                                                         │
/// │   rent while Rented      → AlreadyRented                                │
/// │   return while Available → NotRented                                    │
/// │   No terminal state: a car cycles indefinitely.                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalState {
    /// The car is on the lot and can be rented.
    Available,
    /// The car is out with a customer.
    Rented,
}

impl RentalState {
    /// Maps the persisted availability flag to a state.
    #[inline]
    pub const fn from_available(available: bool) -> Self {
        if available {
            RentalState::Available
        } else {
            RentalState::Rented
        }
    }

    /// Returns the availability flag stored for this state.
    #[inline]
    pub const fn is_available(&self) -> bool {
        matches!(self, RentalState::Available)
    }

    /// Applies a rent transition.
    pub fn rent(self, registration: &str) -> CoreResult<RentalState> {
        match self {
            RentalState::Available => Ok(RentalState::Rented),
            RentalState::Rented => Err(CoreError::AlreadyRented(registration.to_string())),
        }
    }

    /// Applies a return transition.
    pub fn return_car(self, registration: &str) -> CoreResult<RentalState> {
        match self {
            RentalState::Rented => Ok(RentalState::Available),
            RentalState::Available => Err(CoreError::NotRented(registration.to_string())),
        }
    }
}

impl std::fmt::Display for RentalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RentalState::Available => write!(f, "available"),
            RentalState::Rented => write!(f, "rented"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
