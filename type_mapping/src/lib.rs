//! Unified value mapping between Rust types and SQL parameters/columns
//! This crate provides the value model shared across the rowshape workspace

pub mod convert;
pub mod errors;
pub mod sql;
pub mod types;

pub use convert::{FromSqlValue, ToSqlValue};
pub use errors::ConversionError;
pub use sql::{pg_type_to_sql_type, sql_type_to_pg_type};
pub use types::{SqlType, SqlValue};

// Member types callers commonly put on shapes
pub use chrono;
pub use rust_decimal;
pub use uuid;
