//! Error types for the rowshape crate
//!
//! Statement and mapping failures surface as `ShapeError`; `RowShapeError`
//! covers opening a mapper from configuration.

use config::ConfigError;
use shape_object::ShapeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowShapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),
}
