//! Shape Object - core mapping layer for rowshape
//!
//! This crate provides the type descriptions of shapes and their cache, the
//! statement synthesizer and parameter binder, the query materializer and the
//! `Connection` seam with its PostgreSQL adapter.

pub mod binder;
pub mod command;
pub mod connection;
pub mod description;
pub mod dialect;
pub mod errors;
pub mod materialize;
pub mod naming;
pub mod parameters;
pub mod postgres;
pub mod prelude;
pub mod registry;
pub mod shape;
pub mod statement;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod test_shapes;

pub use command::{Command, PositionalCommand};
pub use connection::Connection;
pub use description::{PropertyDescriptor, TypeDescription, TypeDescriptionBuilder};
pub use dialect::{Dialect, PostgresDialect};
pub use errors::ShapeError;
pub use materialize::{ArrayStream, AssocStream, Row, RowStream, ShapeStream};
pub use parameters::{Arguments, Parameters};
pub use registry::TypeRegistry;
pub use shape::Shape;
pub use statement::{OnConflict, StatementSynthesizer};

// Value model, re-exported so generated code only needs this crate in scope
pub use type_mapping::{ConversionError, FromSqlValue, SqlType, SqlValue, ToSqlValue};
