//! # rental-core: Pure Business Logic for the Car Rental Service
//!
//! This crate holds the car entity, the rental state machine and the input
//! rules. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Car Rental Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 rental-api (HTTP + RentalService)               │   │
//! │  │    GET /cars, POST /cars, POST /cars/{reg}/rentals|returns      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐  ┌───────────┐               │   │
//! │  │   │   types   │  │ RentalState  │  │ validation│               │   │
//! │  │   │   Car     │  │  Available   │  │   rules   │               │   │
//! │  │   │  CarView  │  │  Rented      │  │  checks   │               │   │
//! │  │   └───────────┘  └──────────────┘  └───────────┘               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rental-db (Car Store)                        │   │
//! │  │              SQLite queries, migrations, repository             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Car, CarView, RentalState)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rental_core::RentalState;
//!
//! let state = RentalState::Available;
//! let rented = state.rent("ABC123").unwrap();
//! assert_eq!(rented, RentalState::Rented);
//!
//! // Renting twice is rejected, never silently ignored
//! assert!(rented.rent("ABC123").is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a registration (licence plate) string.
pub const MAX_REGISTRATION_LEN: usize = 255;

/// Maximum length of a model name.
pub const MAX_MODEL_LEN: usize = 255;
