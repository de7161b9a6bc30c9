//! Type descriptor model
//!
//! A `TypeDescription` captures everything the statement synthesizer and the
//! materializer need to know about a shape: its table, its members in
//! declaration order and how each member takes part in reads and writes.

use crate::errors::ShapeError;
use crate::naming::to_snake_case;
use std::collections::HashMap;

/// Metadata for one bindable member of a shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    db_name: String,
    is_key: bool,
    is_generated: bool,
    is_computed: bool,
    gettable: bool,
    settable: bool,
}

impl PropertyDescriptor {
    /// A plain gettable and settable member whose column follows the naming convention
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let db_name = to_snake_case(&name);
        Self {
            name,
            db_name,
            is_key: false,
            is_generated: false,
            is_computed: false,
            gettable: true,
            settable: true,
        }
    }

    /// Override the column name
    pub fn column(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Mark as a primary-key component
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Mark as assigned by the database
    pub fn generated(mut self) -> Self {
        self.is_generated = true;
        self
    }

    /// Mark as a derived getter-only member
    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self.settable = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.settable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.gettable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }

    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub fn is_computed(&self) -> bool {
        self.is_computed
    }

    /// Can receive a value from a result column
    pub fn is_writeable(&self) -> bool {
        self.settable && !self.is_computed
    }

    /// Takes part in INSERT value lists and UPDATE assignments
    pub fn is_readable(&self) -> bool {
        self.gettable && !self.is_computed && !self.is_generated
    }

    /// Can be bound as a statement parameter
    pub fn is_argument(&self) -> bool {
        self.gettable
    }
}

/// Immutable description of one shape
#[derive(Debug, Clone)]
pub struct TypeDescription {
    shape_name: String,
    table: String,
    properties: Vec<PropertyDescriptor>,
    index: HashMap<String, usize>,
}

impl TypeDescription {
    pub fn builder(shape_name: impl Into<String>) -> TypeDescriptionBuilder {
        TypeDescriptionBuilder {
            shape_name: shape_name.into(),
            table: None,
            properties: Vec::new(),
        }
    }

    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// All members in declaration order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Look up a member by member name or column name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| p.is_key())
    }

    pub fn non_keys(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| !p.is_key())
    }

    pub fn writeable(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| p.is_writeable())
    }

    pub fn readable(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| p.is_readable())
    }

    pub fn arguments(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| p.is_argument())
    }

    pub fn generated(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.properties.iter().filter(|p| p.is_generated())
    }

    pub fn has_keys(&self) -> bool {
        self.properties.iter().any(|p| p.is_key())
    }

    pub fn has_generated(&self) -> bool {
        self.properties.iter().any(|p| p.is_generated())
    }
}

/// Collects members for a `TypeDescription`
#[derive(Debug, Clone)]
pub struct TypeDescriptionBuilder {
    shape_name: String,
    table: Option<String>,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptionBuilder {
    /// Override the table name (defaults to the lower-cased shape name)
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> Result<TypeDescription, ShapeError> {
        let table = self
            .table
            .unwrap_or_else(|| self.shape_name.to_lowercase());

        let mut index = HashMap::with_capacity(self.properties.len() * 2);
        for (position, property) in self.properties.iter().enumerate() {
            for name in [property.name(), property.db_name()] {
                match index.get(name) {
                    Some(&existing) if existing != position => {
                        return Err(ShapeError::duplicate_name(&self.shape_name, name));
                    }
                    Some(_) => {}
                    None => {
                        index.insert(name.to_string(), position);
                    }
                }
            }
        }

        Ok(TypeDescription {
            shape_name: self.shape_name,
            table,
            properties: self.properties,
            index,
        })
    }
}
