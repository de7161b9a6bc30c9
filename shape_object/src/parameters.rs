//! Named statement parameters

use crate::binder::bind_object;
use crate::errors::ShapeError;
use crate::registry::TypeRegistry;
use crate::shape::Shape;
use indexmap::IndexMap;
use type_mapping::{SqlValue, ToSqlValue};

/// Ordered name to value map; binding an existing name replaces its value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: IndexMap<String, SqlValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(capacity),
        }
    }

    /// Builder-style bind
    pub fn with(mut self, name: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.bind(name, value.to_sql_value());
        self
    }

    /// Bind a value, returning the one it replaced
    pub fn bind(&mut self, name: impl Into<String>, value: SqlValue) -> Option<SqlValue> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bind every entry of `other`, overriding existing names
    pub fn merge(&mut self, other: &Parameters) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Anything that can supply statement parameters: a shape, an explicit
/// `Parameters` map, or `()` for none.
pub trait Arguments: Send + Sync {
    fn bind_to(&self, registry: &TypeRegistry, parameters: &mut Parameters)
        -> Result<(), ShapeError>;
}

impl<T: Shape> Arguments for T {
    fn bind_to(
        &self,
        registry: &TypeRegistry,
        parameters: &mut Parameters,
    ) -> Result<(), ShapeError> {
        bind_object(registry, self, parameters)
    }
}

impl Arguments for Parameters {
    fn bind_to(&self, _: &TypeRegistry, parameters: &mut Parameters) -> Result<(), ShapeError> {
        parameters.merge(self);
        Ok(())
    }
}

impl Arguments for () {
    fn bind_to(&self, _: &TypeRegistry, _: &mut Parameters) -> Result<(), ShapeError> {
        Ok(())
    }
}
