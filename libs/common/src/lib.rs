//! Common library for the studio membership services
//!
//! This crate provides shared infrastructure used by the services: PostgreSQL
//! connectivity, the Redis client wrapper and the error types they report.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod error;
