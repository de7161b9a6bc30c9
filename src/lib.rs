//! # rowshape
//!
//! A lightweight object mapping layer for PostgreSQL. Plain structs ("shapes")
//! describe their table and columns once; the mapper synthesizes the SQL,
//! binds the parameters and maps result rows back onto shapes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowshape::prelude::*;
//!
//! #[derive(Debug, Default, Shape)]
//! #[table(name = "cars")]
//! pub struct Car {
//!     #[key]
//!     pub id: i32,
//!     pub make: String,
//!     #[generated]
//!     pub date_registered: Option<DateTime<Utc>>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let mut mapper = Mapper::connect(&config).await?;
//!
//!     let mut car = Car { id: 1, make: "Volvo".to_string(), ..Default::default() };
//!     mapper.insert_object(&mut car).await?;
//!     println!("Registered at {:?}", car.date_registered);
//!
//!     let found: Option<Car> = mapper.get(&[&1]).await?;
//!     println!("Found: {:?}", found);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod crud;
pub mod errors;
pub mod orm;
pub mod prelude;
pub mod transaction;

// Re-export the main public types for convenience
pub use core::Mapper;
pub use errors::RowShapeError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, DialectKind, MapperConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated derive code to work correctly
pub use shape_derive::{Shape, SqlEnum};
pub use shape_object;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
