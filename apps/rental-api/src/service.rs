//! # Rental Service
//!
//! Business operations over the Car Store: list, add, rent, return.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rental Operations                                 │
//! │                                                                         │
//! │  list_cars()   ── cars().list() ──────────────► Vec<CarView>           │
//! │                                                                         │
//! │  add_car()     ── validate ── cars().create() ► registration           │
//! │                                  └─ duplicate ► DuplicateRegistration  │
//! │                                                                         │
//! │  rent_car()    ── cars().mark_rented() ───────► ()                     │
//! │                       ├─ missing ─────────────► CarNotFound            │
//! │                       └─ already out ─────────► AlreadyRented          │
//! │                                                                         │
//! │  return_car()  ── validate km ── cars().apply_return() ► ()            │
//! │                       ├─ missing ─────────────► CarNotFound            │
//! │                       ├─ not out ─────────────► NotRented              │
//! │                       └─ odometer overflow ───► Validation             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. Storage failures surface as [`ServiceError::Storage`]
//! and the caller must resubmit.

use chrono::Utc;
use tracing::{debug, info, warn};

use rental_core::validation::{
    validate_kilometers, validate_mileage, validate_model, validate_registration,
};
use rental_core::{Car, CarView, CoreError};
use rental_db::{Database, DbError};

/// Rental service failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A rental rule was violated; the request itself is at fault.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The Car Store could not complete the operation.
    #[error("Storage error: {0}")]
    Storage(DbError),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => CoreError::CarNotFound(id).into(),
            DbError::UniqueViolation { value, .. } => CoreError::DuplicateRegistration(value).into(),
            DbError::AlreadyRented(registration) => CoreError::AlreadyRented(registration).into(),
            DbError::NotRented(registration) => CoreError::NotRented(registration).into(),
            DbError::InvalidValue(err) => CoreError::Validation(err).into(),
            other => ServiceError::Storage(other),
        }
    }
}

/// Result type for rental operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The four rental operations plus a single-car lookup.
///
/// Holds the database handle it was constructed with; clone it freely, the
/// clone shares the pool.
#[derive(Debug, Clone)]
pub struct RentalService {
    db: Database,
}

impl RentalService {
    /// Creates a service over an already-open database.
    pub fn new(db: Database) -> Self {
        RentalService { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Lists every car in the fleet.
    pub async fn list_cars(&self) -> ServiceResult<Vec<CarView>> {
        let cars = self.db.cars().list().await?;
        Ok(cars.into_iter().map(CarView::from).collect())
    }

    /// Looks up one car.
    pub async fn find_car(&self, registration: &str) -> ServiceResult<CarView> {
        let car = self.db.cars().find_by_registration(registration).await?;
        Ok(CarView::from(car))
    }

    /// Registers a new, available car.
    ///
    /// ## Returns
    /// The registration, which doubles as the car's identity.
    ///
    /// ## Errors
    /// * `Validation` - blank registration, overlong field, negative mileage
    /// * `DuplicateRegistration` - registration already in the fleet
    pub async fn add_car(
        &self,
        model: &str,
        registration: &str,
        mileage: i64,
    ) -> ServiceResult<String> {
        validate_registration(registration).map_err(CoreError::from)?;
        validate_model(model).map_err(CoreError::from)?;
        validate_mileage(mileage).map_err(CoreError::from)?;

        let car = Car::new(registration, model, mileage, Utc::now());

        let id = self.db.cars().create(&car).await.map_err(|e| {
            if matches!(e, DbError::UniqueViolation { .. }) {
                warn!(registration = %registration, "Rejected duplicate registration");
            }
            e
        })?;

        info!(registration = %id, model = %car.model, mileage, "Car added");
        Ok(id)
    }

    /// Rents out an available car.
    ///
    /// The availability check and the flip happen in one conditional
    /// update, so of several concurrent calls exactly one succeeds.
    pub async fn rent_car(&self, registration: &str) -> ServiceResult<()> {
        debug!(registration = %registration, "rent_car");

        match self.db.cars().mark_rented(registration).await {
            Ok(()) => {
                info!(registration = %registration, "Car rented");
                Ok(())
            }
            Err(e) => {
                if !e.is_storage_failure() {
                    warn!(registration = %registration, reason = %e, "Rent rejected");
                }
                Err(e.into())
            }
        }
    }

    /// Takes a rented car back and adds the distance driven to its mileage.
    ///
    /// Negative distances are rejected before the store is touched. A
    /// distance that would overflow the odometer is rejected by the store
    /// and leaves the car rented.
    pub async fn return_car(&self, registration: &str, kilometers: i64) -> ServiceResult<()> {
        debug!(registration = %registration, kilometers, "return_car");

        validate_kilometers(kilometers).map_err(CoreError::from)?;

        match self.db.cars().apply_return(registration, kilometers).await {
            Ok(()) => {
                info!(registration = %registration, kilometers, "Car returned");
                Ok(())
            }
            Err(e) => {
                if !e.is_storage_failure() {
                    warn!(registration = %registration, reason = %e, "Return rejected");
                }
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rental_core::ValidationError;
    use rental_db::DbConfig;
    use std::sync::Arc;

    async fn service() -> RentalService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        RentalService::new(db)
    }

    #[tokio::test]
    async fn test_list_before_any_add_is_empty() {
        let svc = service().await;
        assert!(svc.list_cars().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list_round_trip() {
        let svc = service().await;

        let id = svc.add_car("Civic", "ABC123", 1000).await.unwrap();
        assert_eq!(id, "ABC123");

        let cars = svc.list_cars().await.unwrap();
        let matching: Vec<&CarView> = cars.iter().filter(|c| c.registration == "ABC123").collect();
        assert_eq!(
            matching,
            vec![&CarView {
                model: "Civic".to_string(),
                registration: "ABC123".to_string(),
                mileage: 1000,
                available: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_always_rejected() {
        let svc = service().await;
        svc.add_car("Civic", "ABC123", 1000).await.unwrap();

        for (model, mileage) in [("Civic", 1000), ("Golf", 0), ("Model 3", 42)] {
            let err = svc.add_car(model, "ABC123", mileage).await.unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Domain(CoreError::DuplicateRegistration(ref r)) if r == "ABC123"
            ));
        }

        assert_eq!(svc.list_cars().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_validation() {
        let svc = service().await;

        let err = svc.add_car("Civic", "", 0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = svc.add_car("Civic", "ABC123", -1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::Validation(ValidationError::Negative { .. }))
        ));

        assert!(svc.list_cars().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_accepts_free_text_fields() {
        let svc = service().await;

        svc.add_car("Focus", "AB12 CDE", 0).await.unwrap();
        svc.add_car("", "XYZ789", 0).await.unwrap();
        svc.add_car(&"M".repeat(200), &"R".repeat(40), 5).await.unwrap();

        assert_eq!(svc.find_car("AB12 CDE").await.unwrap().model, "Focus");
        assert_eq!(svc.find_car("XYZ789").await.unwrap().model, "");
        assert_eq!(svc.list_cars().await.unwrap().len(), 3);

        let err = svc.add_car("Civic", &"R".repeat(256), 0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::Validation(ValidationError::TooLong { .. }))
        ));
    }

    #[tokio::test]
    async fn test_return_that_would_overflow_mileage() {
        let svc = service().await;
        svc.add_car("Civic", "BIG1", i64::MAX - 10).await.unwrap();
        svc.add_car("Golf", "KLM456", 0).await.unwrap();
        svc.rent_car("BIG1").await.unwrap();

        let err = svc.return_car("BIG1", 100).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));

        // The fleet stays readable and the car stays rented
        let car = svc.find_car("BIG1").await.unwrap();
        assert_eq!(car.mileage, i64::MAX - 10);
        assert!(!car.available);
        assert_eq!(svc.list_cars().await.unwrap().len(), 2);

        svc.return_car("BIG1", 10).await.unwrap();
        assert_eq!(svc.find_car("BIG1").await.unwrap().mileage, i64::MAX);
    }

    #[tokio::test]
    async fn test_rent_unknown_car() {
        let svc = service().await;
        let err = svc.rent_car("NOPE").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::CarNotFound(ref r)) if r == "NOPE"));
    }

    #[tokio::test]
    async fn test_rent_twice_leaves_state_unchanged() {
        let svc = service().await;
        svc.add_car("Civic", "ABC123", 1000).await.unwrap();
        svc.rent_car("ABC123").await.unwrap();

        let before = svc.find_car("ABC123").await.unwrap();
        let err = svc.rent_car("ABC123").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::AlreadyRented(_))));

        assert_eq!(svc.find_car("ABC123").await.unwrap(), before);
        assert!(!before.available);
    }

    #[tokio::test]
    async fn test_rent_and_return_scenario() {
        let svc = service().await;
        svc.add_car("Civic", "ABC123", 1000).await.unwrap();

        svc.rent_car("ABC123").await.unwrap();
        assert!(!svc.find_car("ABC123").await.unwrap().available);

        svc.return_car("ABC123", 50).await.unwrap();
        assert_eq!(
            svc.find_car("ABC123").await.unwrap(),
            CarView {
                model: "Civic".to_string(),
                registration: "ABC123".to_string(),
                mileage: 1050,
                available: true,
            }
        );
    }

    #[tokio::test]
    async fn test_mileage_accumulates_over_cycles() {
        let svc = service().await;
        svc.add_car("Golf", "KLM456", 0).await.unwrap();

        for km in [10, 0, 250] {
            svc.rent_car("KLM456").await.unwrap();
            svc.return_car("KLM456", km).await.unwrap();
        }

        assert_eq!(svc.find_car("KLM456").await.unwrap().mileage, 260);
    }

    #[tokio::test]
    async fn test_return_available_car_rejected() {
        let svc = service().await;
        svc.add_car("Civic", "ABC123", 1000).await.unwrap();

        let err = svc.return_car("ABC123", 50).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::NotRented(_))));
        assert_eq!(svc.find_car("ABC123").await.unwrap().mileage, 1000);
    }

    #[tokio::test]
    async fn test_return_negative_kilometers_rejected() {
        let svc = service().await;
        svc.add_car("Civic", "ABC123", 1000).await.unwrap();
        svc.rent_car("ABC123").await.unwrap();

        let err = svc.return_car("ABC123", -5).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::Validation(_))));

        let car = svc.find_car("ABC123").await.unwrap();
        assert_eq!(car.mileage, 1000);
        assert!(!car.available);
    }

    #[tokio::test]
    async fn test_return_unknown_car() {
        let svc = service().await;
        let err = svc.return_car("NOPE", 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::CarNotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_rent_has_one_winner() {
        let svc = Arc::new(service().await);
        svc.add_car("Civic", "ABC123", 0).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.rent_car("ABC123").await }));
        }

        let mut wins = 0;
        let mut already_rented = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => wins += 1,
                Err(ServiceError::Domain(CoreError::AlreadyRented(_))) => already_rented += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(already_rented, 7);
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_a_domain_error() {
        let svc = service().await;
        svc.database().close().await;

        let err = svc.list_cars().await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}
