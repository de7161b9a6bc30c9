//! Convenience re-exports for common rowshape usage
//!
//! This prelude module re-exports the most commonly used items, including the
//! `shape_object` path the derive macros expand to.
//!
//! # Example
//!
//! ```rust
//! use rowshape::prelude::*;
//!
//! // Mapper, Shape, Parameters and the value model are now in scope
//! ```

// Core rowshape components
pub use crate::core::Mapper;
pub use crate::errors::RowShapeError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, DialectKind, MapperConfig};

// Re-export commonly used shape-object types for convenience
pub use shape_object::prelude::*;

// Re-export shape_object module for derive-generated code
pub use shape_object;

// Derive macros
pub use shape_derive::{Shape, SqlEnum};

// Common external dependencies
pub use async_trait;
pub use futures::{StreamExt, TryStreamExt};
pub use sqlx;
pub use tokio;

// Types commonly used as shape members
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use type_mapping::rust_decimal::Decimal;
pub use uuid::Uuid;

// Commonly used sqlx types
pub use sqlx::{PgPool, Postgres, Transaction};
