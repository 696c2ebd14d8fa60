//! # Seed Data Generator
//!
//! Populates the database with a small demo fleet for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./rental.db
//! cargo run -p rental-db --bin seed
//!
//! # Specify database path
//! cargo run -p rental-db --bin seed -- --db ./data/rental.db
//! ```
//!
//! Running it twice is harmless: registrations that already exist are
//! skipped.

use anyhow::Context;
use chrono::Utc;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rental_core::Car;
use rental_db::{Database, DbConfig, DbError};

/// Demo fleet: (registration, model, mileage).
const FLEET: &[(&str, &str, i64)] = &[
    ("ABC123", "Honda Civic", 1000),
    ("XYZ789", "Toyota Corolla", 24_500),
    ("KLM456", "Volkswagen Golf", 8_200),
    ("RST321", "Ford Focus", 61_000),
    ("DEF654", "Tesla Model 3", 3_400),
    ("GHI987", "Renault Clio", 0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = "rental.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Car Rental Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./rental.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    let repo = db.cars();
    let mut inserted = 0;

    for (registration, model, mileage) in FLEET {
        let car = Car::new(*registration, *model, *mileage, Utc::now());
        match repo.create(&car).await {
            Ok(_) => inserted += 1,
            Err(DbError::UniqueViolation { .. }) => {
                warn!(registration = %registration, "Already present, skipping");
            }
            Err(e) => return Err(e).context("inserting demo car"),
        }
    }

    let total = repo.count().await?;
    info!(inserted, total, path = %db_path, "Seed complete");

    db.close().await;
    Ok(())
}
