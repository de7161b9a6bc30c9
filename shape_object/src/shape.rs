use crate::description::TypeDescription;
use crate::errors::ShapeError;
use type_mapping::{ConversionError, SqlValue};

/// A record type usable as a row payload.
///
/// Usually derived:
/// ```ignore
/// use rowshape::prelude::*;
///
/// #[derive(Debug, Default, Shape)]
/// #[table(name = "cars")]
/// pub struct Car {
///     #[key]
///     pub id: String,
///     pub make: String,
///     #[generated]
///     pub date_registered: Option<DateTime<Utc>>,
/// }
/// ```
pub trait Shape: Send + Sync + 'static {
    /// Build the description of this shape. Called once per registry.
    fn describe() -> Result<TypeDescription, ShapeError>
    where
        Self: Sized;

    /// Read a gettable member by member name
    fn read_member(&self, name: &str) -> Option<SqlValue>;

    /// Assign a settable member by member name. Returns `Ok(false)` when no
    /// such member can be set.
    fn write_member(&mut self, name: &str, value: SqlValue) -> Result<bool, ConversionError>;
}
