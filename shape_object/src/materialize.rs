//! Query materializer
//!
//! Maps result rows onto shapes (through the description's dual name index)
//! or onto generic associative and positional forms.

use crate::description::TypeDescription;
use crate::errors::ShapeError;
use crate::shape::Shape;
use futures::stream::{BoxStream, StreamExt};
use indexmap::IndexMap;
use std::sync::Arc;
use type_mapping::SqlValue;

/// One result row: shared column names plus one value per column
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    pub fn into_first(self) -> Option<SqlValue> {
        self.values.into_iter().next()
    }

    pub fn into_assoc(self) -> IndexMap<String, SqlValue> {
        self.columns.iter().cloned().zip(self.values).collect()
    }
}

pub type RowStream<'c> = BoxStream<'c, Result<Row, ShapeError>>;
pub type ShapeStream<'c, T> = BoxStream<'c, Result<T, ShapeError>>;
pub type AssocStream<'c> = BoxStream<'c, Result<IndexMap<String, SqlValue>, ShapeError>>;
pub type ArrayStream<'c> = BoxStream<'c, Result<Vec<SqlValue>, ShapeError>>;

/// Build a `T` from a row. Columns without a writeable member are ignored.
pub fn materialize<T: Shape + Default>(
    description: &TypeDescription,
    row: Row,
) -> Result<T, ShapeError> {
    let mut shape = T::default();
    assign(description, &mut shape, row)?;
    Ok(shape)
}

/// Write every column of `row` that names a writeable member onto `target`
pub fn assign<T: Shape>(
    description: &TypeDescription,
    target: &mut T,
    row: Row,
) -> Result<(), ShapeError> {
    let Row { columns, values } = row;
    for (column, value) in columns.iter().zip(values) {
        let Some(property) = description.property(column) else {
            continue;
        };
        if !property.is_writeable() {
            continue;
        }
        target
            .write_member(property.name(), value)
            .map_err(|e| ShapeError::member(property.name(), e))?;
    }
    Ok(())
}

/// Lazily materialize each row of `rows` as a `T`
pub fn shapes<'c, T: Shape + Default>(
    description: Arc<TypeDescription>,
    rows: RowStream<'c>,
) -> ShapeStream<'c, T> {
    rows.map(move |row| row.and_then(|row| materialize::<T>(&description, row)))
        .boxed()
}

pub fn assoc(rows: RowStream<'_>) -> AssocStream<'_> {
    rows.map(|row| row.map(Row::into_assoc)).boxed()
}

pub fn arrays(rows: RowStream<'_>) -> ArrayStream<'_> {
    rows.map(|row| row.map(Row::into_values)).boxed()
}

/// A stream yielding a single error, for failures before a cursor opens
pub fn failed<'c, T: Send + 'c>(error: ShapeError) -> BoxStream<'c, Result<T, ShapeError>> {
    futures::stream::once(async move { Err(error) }).boxed()
}
