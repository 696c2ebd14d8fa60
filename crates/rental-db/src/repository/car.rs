//! # Car Repository
//!
//! Database operations for cars.
//!
//! ## Rental Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atomic State Transitions                             │
//! │                                                                         │
//! │  ❌ WRONG: read, check, then write (two requests can both see          │
//! │            available = 1 and both "win")                               │
//! │     SELECT available FROM cars WHERE registration = ?                  │
//! │     UPDATE cars SET available = 0 WHERE registration = ?               │
//! │                                                                         │
//! │  ✅ CORRECT: the precondition lives in the WHERE clause                │
//! │     UPDATE cars SET available = 0                                      │
//! │     WHERE registration = ? AND available = 1                           │
//! │                                                                         │
//! │  rows_affected == 1 → transition happened                              │
//! │  rows_affected == 0 → car missing, already in the target state, or    │
//! │                       mileage would overflow (the follow-up read runs  │
//! │                       the row through RentalState to tell which)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Returns additionally run inside a transaction so the mileage bump, the
//! availability flip and the follow-up read see one snapshot.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use rental_core::validation::{accumulate_mileage, validate_kilometers};
use rental_core::Car;

const ENTITY: &str = "Car";

const SELECT_BY_REGISTRATION: &str = r#"
    SELECT
        registration,
        model,
        mileage,
        available,
        created_at,
        updated_at
    FROM cars
    WHERE registration = ?1
"#;

/// Repository for car database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CarRepository::new(pool);
///
/// repo.create(&car).await?;
/// repo.mark_rented("ABC123").await?;
/// repo.apply_return("ABC123", 50).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Lists all cars in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT
                registration,
                model,
                mileage,
                available,
                created_at,
                updated_at
            FROM cars
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// Inserts a new car.
    ///
    /// ## Returns
    /// * `Ok(String)` - The registration, which is the car's identity
    /// * `Err(DbError::UniqueViolation)` - Registration already exists
    pub async fn create(&self, car: &Car) -> DbResult<String> {
        debug!(registration = %car.registration, model = %car.model, "Inserting car");

        sqlx::query(
            r#"
            INSERT INTO cars (
                registration, model, mileage, available, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6
            )
            "#,
        )
        .bind(&car.registration)
        .bind(&car.model)
        .bind(car.mileage)
        .bind(car.available)
        .bind(car.created_at)
        .bind(car.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("registration", &car.registration),
            other => other,
        })?;

        Ok(car.registration.clone())
    }

    /// Gets a car by its registration.
    ///
    /// ## Returns
    /// * `Ok(Car)` - Car found
    /// * `Err(DbError::NotFound)` - No such registration
    pub async fn find_by_registration(&self, registration: &str) -> DbResult<Car> {
        sqlx::query_as::<_, Car>(SELECT_BY_REGISTRATION)
            .bind(registration)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, registration))
    }

    /// Sets the availability flag without looking at its current value.
    ///
    /// Rental flows use [`mark_rented`](Self::mark_rented) and
    /// [`apply_return`](Self::apply_return); this is for administrative
    /// corrections.
    pub async fn set_availability(&self, registration: &str, available: bool) -> DbResult<()> {
        debug!(registration = %registration, available, "Setting availability");

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                available = ?2,
                updated_at = ?3
            WHERE registration = ?1
            "#,
        )
        .bind(registration)
        .bind(available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, registration));
        }

        Ok(())
    }

    /// Flips an available car to rented in one conditional update.
    ///
    /// ## Returns
    /// * `Ok(())` - The car was available and is now rented
    /// * `Err(DbError::NotFound)` - No such registration
    /// * `Err(DbError::AlreadyRented)` - The car was already out
    pub async fn mark_rented(&self, registration: &str) -> DbResult<()> {
        debug!(registration = %registration, "Marking car rented");

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                available = 0,
                updated_at = ?2
            WHERE registration = ?1 AND available = 1
            "#,
        )
        .bind(registration)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let car = sqlx::query_as::<_, Car>(SELECT_BY_REGISTRATION)
            .bind(registration)
            .fetch_optional(&self.pool)
            .await?;

        Err(rent_rejection(car, registration))
    }

    /// Records a return: adds `kilometers` to the mileage and makes the car
    /// available again, in one transaction.
    ///
    /// The update only matches while the sum still fits in an `i64`, so an
    /// overflowing return is refused instead of being stored as a REAL.
    ///
    /// ## Returns
    /// * `Ok(())` - Committed
    /// * `Err(DbError::NotFound)` - No such registration (rolled back)
    /// * `Err(DbError::NotRented)` - The car was not out (rolled back)
    /// * `Err(DbError::InvalidValue)` - Negative distance, or the mileage
    ///   would overflow (rolled back)
    pub async fn apply_return(&self, registration: &str, kilometers: i64) -> DbResult<()> {
        debug!(registration = %registration, kilometers, "Applying return");

        validate_kilometers(kilometers).map_err(DbError::InvalidValue)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                mileage = mileage + ?2,
                available = 1,
                updated_at = ?3
            WHERE registration = ?1
              AND available = 0
              AND mileage <= ?4 - ?2
            "#,
        )
        .bind(registration)
        .bind(kilometers)
        .bind(Utc::now())
        .bind(i64::MAX)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 1 {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Ok(());
        }

        let car = sqlx::query_as::<_, Car>(SELECT_BY_REGISTRATION)
            .bind(registration)
            .fetch_optional(&mut *tx)
            .await?;

        if let Err(e) = tx.rollback().await {
            warn!(registration = %registration, error = %e, "Rollback failed");
        }

        Err(return_rejection(car, registration, kilometers))
    }

    /// Counts cars (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Explains why a conditional rent update matched nothing.
fn rent_rejection(car: Option<Car>, registration: &str) -> DbError {
    let car = match car {
        Some(car) => car,
        None => return DbError::not_found(ENTITY, registration),
    };

    match car.state().rent(registration) {
        Err(e) => e.into(),
        // Returned again between the update and the read; this rent still lost.
        Ok(_) => DbError::AlreadyRented(registration.to_string()),
    }
}

/// Explains why a conditional return update matched nothing.
fn return_rejection(car: Option<Car>, registration: &str, kilometers: i64) -> DbError {
    let car = match car {
        Some(car) => car,
        None => return DbError::not_found(ENTITY, registration),
    };

    if let Err(e) = car.state().return_car(registration) {
        return e.into();
    }

    match accumulate_mileage(car.mileage, kilometers) {
        Err(e) => DbError::InvalidValue(e),
        Ok(_) => DbError::Internal(format!("return of {registration} matched no row")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
