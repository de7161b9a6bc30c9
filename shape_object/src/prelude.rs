//! Convenience re-exports for common shape-object usage

// Core traits
pub use crate::connection::Connection;
pub use crate::parameters::Arguments;
pub use crate::shape::Shape;

// Descriptions and their cache
pub use crate::description::{PropertyDescriptor, TypeDescription};
pub use crate::registry::TypeRegistry;

// Statements
pub use crate::command::Command;
pub use crate::dialect::{Dialect, PostgresDialect};
pub use crate::parameters::Parameters;
pub use crate::statement::StatementSynthesizer;

// Results
pub use crate::materialize::{ArrayStream, AssocStream, Row, ShapeStream};

// Error types
pub use crate::errors::ShapeError;

// Value model
pub use type_mapping::{ConversionError, FromSqlValue, SqlType, SqlValue, ToSqlValue};
