//! Parameter binder
//!
//! One parameter per argument member, named by member name. Row lists suffix
//! each name with the zero-based row index.

use crate::description::TypeDescription;
use crate::errors::ShapeError;
use crate::parameters::Parameters;
use crate::registry::TypeRegistry;
use crate::shape::Shape;
use type_mapping::SqlValue;

/// Bind every argument member of `data`
pub fn bind_object<T: Shape>(
    registry: &TypeRegistry,
    data: &T,
    parameters: &mut Parameters,
) -> Result<(), ShapeError> {
    let description = registry.describe::<T>()?;
    for property in description.arguments() {
        let value = read_argument(&description, data, property.name())?;
        parameters.bind(property.name(), value);
    }
    Ok(())
}

/// Bind every argument member of every row, suffixing names with the row index
pub fn bind_rows<T: Shape>(
    registry: &TypeRegistry,
    rows: &[T],
    parameters: &mut Parameters,
) -> Result<(), ShapeError> {
    let description = registry.describe::<T>()?;
    for (row, data) in rows.iter().enumerate() {
        for property in description.arguments() {
            let name = format!("{}{}", property.name(), row);
            if parameters.contains(&name) {
                return Err(ShapeError::duplicate_name(description.shape_name(), &name));
            }
            let value = read_argument(&description, data, property.name())?;
            parameters.bind(name, value);
        }
    }
    Ok(())
}

fn read_argument<T: Shape>(
    description: &TypeDescription,
    data: &T,
    member: &str,
) -> Result<SqlValue, ShapeError> {
    data.read_member(member).ok_or_else(|| {
        ShapeError::InvalidShape(format!(
            "{} describes member '{}' but does not expose it",
            description.shape_name(),
            member
        ))
    })
}
