//! # Repository Module
//!
//! Database repository implementations for the Car Store.
//!
//! ## Repository Pattern
//! ```text
//! RentalService
//!      │
//!      │  db.cars().mark_rented("ABC123")
//!      ▼
//! CarRepository
//! ├── list(&self)
//! ├── create(&self, car)
//! ├── find_by_registration(&self, registration)
//! ├── set_availability(&self, registration, available)
//! ├── mark_rented(&self, registration)
//! └── apply_return(&self, registration, kilometers)
//!      │
//!      │  SQL Query
//!      ▼
//! SQLite Database
//! ```
//!
//! ## Available Repositories
//!
//! - [`car::CarRepository`] - Car CRUD and rental state transitions

pub mod car;
