use thiserror::Error;
use type_mapping::ConversionError;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Duplicate name '{name}' on shape {shape}")]
    DuplicateName { shape: String, name: String },

    #[error("No value bound for parameter @{0}")]
    MissingParameter(String),

    #[error("Query returned no rows")]
    EmptyResult,

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Conversion error on member '{member}': {source}")]
    Member {
        member: String,
        #[source]
        source: ConversionError,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ShapeError {
    /// Attach the member name to a conversion failure
    pub fn member(member: &str, source: ConversionError) -> Self {
        ShapeError::Member {
            member: member.to_string(),
            source,
        }
    }

    pub fn duplicate_name(shape: &str, name: &str) -> Self {
        ShapeError::DuplicateName {
            shape: shape.to_string(),
            name: name.to_string(),
        }
    }
}
