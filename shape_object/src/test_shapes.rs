//! Hand-written shapes shared by the unit tests of this crate

use crate::{PropertyDescriptor, Shape, ShapeError, TypeDescription};
use chrono::{DateTime, Utc};
use type_mapping::{ConversionError, FromSqlValue, SqlValue, ToSqlValue};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Car {
    pub id: String,
    pub make: String,
    pub date_registered: Option<DateTime<Utc>>,
}

impl Car {
    pub fn new(id: &str, make: &str) -> Self {
        Self {
            id: id.to_string(),
            make: make.to_string(),
            date_registered: None,
        }
    }
}

impl Shape for Car {
    fn describe() -> Result<TypeDescription, ShapeError> {
        TypeDescription::builder("Car")
            .table("cars")
            .property(PropertyDescriptor::new("id").key())
            .property(PropertyDescriptor::new("make"))
            .property(PropertyDescriptor::new("date_registered").generated())
            .build()
    }

    fn read_member(&self, name: &str) -> Option<SqlValue> {
        match name {
            "id" => Some(self.id.to_sql_value()),
            "make" => Some(self.make.to_sql_value()),
            "date_registered" => Some(self.date_registered.to_sql_value()),
            _ => None,
        }
    }

    fn write_member(&mut self, name: &str, value: SqlValue) -> Result<bool, ConversionError> {
        match name {
            "id" => self.id = FromSqlValue::from_sql_value(value)?,
            "make" => self.make = FromSqlValue::from_sql_value(value)?,
            "date_registered" => self.date_registered = FromSqlValue::from_sql_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Shape for Person {
    fn describe() -> Result<TypeDescription, ShapeError> {
        TypeDescription::builder("Person")
            .table("persons")
            .property(PropertyDescriptor::new("id").key().generated())
            .property(PropertyDescriptor::new("first_name"))
            .property(PropertyDescriptor::new("last_name"))
            .property(PropertyDescriptor::new("full_name").computed())
            .property(PropertyDescriptor::new("age"))
            .build()
    }

    fn read_member(&self, name: &str) -> Option<SqlValue> {
        match name {
            "id" => Some(self.id.to_sql_value()),
            "first_name" => Some(self.first_name.to_sql_value()),
            "last_name" => Some(self.last_name.to_sql_value()),
            "full_name" => Some(self.full_name().to_sql_value()),
            "age" => Some(self.age.to_sql_value()),
            _ => None,
        }
    }

    fn write_member(&mut self, name: &str, value: SqlValue) -> Result<bool, ConversionError> {
        match name {
            "id" => self.id = FromSqlValue::from_sql_value(value)?,
            "first_name" => self.first_name = FromSqlValue::from_sql_value(value)?,
            "last_name" => self.last_name = FromSqlValue::from_sql_value(value)?,
            "age" => self.age = FromSqlValue::from_sql_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Shape without keys
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub name: String,
}

impl Shape for Document {
    fn describe() -> Result<TypeDescription, ShapeError> {
        TypeDescription::builder("Document")
            .property(PropertyDescriptor::new("name"))
            .build()
    }

    fn read_member(&self, name: &str) -> Option<SqlValue> {
        (name == "name").then(|| self.name.to_sql_value())
    }

    fn write_member(&mut self, name: &str, value: SqlValue) -> Result<bool, ConversionError> {
        if name != "name" {
            return Ok(false);
        }
        self.name = FromSqlValue::from_sql_value(value)?;
        Ok(true)
    }
}

/// Shape whose bulk parameter names collide (`a1` row 0 vs `a` row 10)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ambiguous {
    pub a: i32,
    pub a1: i32,
}

impl Shape for Ambiguous {
    fn describe() -> Result<TypeDescription, ShapeError> {
        TypeDescription::builder("Ambiguous")
            .property(PropertyDescriptor::new("a"))
            .property(PropertyDescriptor::new("a1"))
            .build()
    }

    fn read_member(&self, name: &str) -> Option<SqlValue> {
        match name {
            "a" => Some(self.a.to_sql_value()),
            "a1" => Some(self.a1.to_sql_value()),
            _ => None,
        }
    }

    fn write_member(&mut self, name: &str, value: SqlValue) -> Result<bool, ConversionError> {
        match name {
            "a" => self.a = FromSqlValue::from_sql_value(value)?,
            "a1" => self.a1 = FromSqlValue::from_sql_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
