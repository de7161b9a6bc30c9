use crate::types::SqlType;
use thiserror::Error;

/// Errors raised while coercing a SqlValue into a Rust type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Unexpected NULL for non-optional {expected}")]
    UnexpectedNull { expected: &'static str },

    #[error("Cannot convert {found} value to {expected}")]
    Mismatch {
        expected: &'static str,
        found: SqlType,
    },

    #[error("Value {value} is out of range for {expected}")]
    OutOfRange {
        expected: &'static str,
        value: String,
    },

    #[error("'{value}' is not a variant of {enum_name}")]
    UnknownVariant {
        enum_name: &'static str,
        value: String,
    },

    #[error("Failed to parse {expected} from '{value}': {reason}")]
    Parse {
        expected: &'static str,
        value: String,
        reason: String,
    },
}

impl ConversionError {
    pub fn mismatch(expected: &'static str, found: &crate::SqlValue) -> Self {
        match found {
            crate::SqlValue::Null(_) => ConversionError::UnexpectedNull { expected },
            other => ConversionError::Mismatch {
                expected,
                found: other.sql_type(),
            },
        }
    }
}
