//! Conversion traits
//!
//! `ToSqlValue` turns a member value into a bindable `SqlValue`;
//! `FromSqlValue` coerces a column value back into a member type.

use crate::errors::ConversionError;
use crate::types::{SqlType, SqlValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Types that can be bound as a SQL parameter
pub trait ToSqlValue {
    fn to_sql_value(&self) -> SqlValue;

    /// The SQL type used when this value is NULL
    fn sql_type() -> SqlType
    where
        Self: Sized;
}

/// Types that can be read back from a result column
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError>;
}

impl<T: ToSqlValue> ToSqlValue for &T {
    fn to_sql_value(&self) -> SqlValue {
        (**self).to_sql_value()
    }

    fn sql_type() -> SqlType {
        T::sql_type()
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text((*self).to_string())
    }

    fn sql_type() -> SqlType {
        SqlType::Text
    }
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(&self) -> SqlValue {
        self.clone()
    }

    fn sql_type() -> SqlType {
        SqlType::Text
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(value) => value.to_sql_value(),
            None => SqlValue::Null(T::sql_type()),
        }
    }

    fn sql_type() -> SqlType {
        T::sql_type()
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Null(_) => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

/// Widen any integer variant to i64
fn integer(value: &SqlValue) -> Option<i64> {
    match value {
        SqlValue::SmallInt(v) => Some(i64::from(*v)),
        SqlValue::Int(v) => Some(i64::from(*v)),
        SqlValue::BigInt(v) => Some(*v),
        _ => None,
    }
}

macro_rules! integer_conversion {
    ($ty:ty, $variant:ident, $sql_type:ident) => {
        impl ToSqlValue for $ty {
            fn to_sql_value(&self) -> SqlValue {
                SqlValue::$variant(*self)
            }

            fn sql_type() -> SqlType {
                SqlType::$sql_type
            }
        }

        impl FromSqlValue for $ty {
            fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
                let wide = integer(&value)
                    .ok_or_else(|| ConversionError::mismatch(stringify!($ty), &value))?;
                <$ty>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                    expected: stringify!($ty),
                    value: wide.to_string(),
                })
            }
        }
    };
}

integer_conversion!(i16, SmallInt, SmallInt);
integer_conversion!(i32, Int, Int);
integer_conversion!(i64, BigInt, BigInt);

impl ToSqlValue for f32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Real(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Real
    }
}

impl FromSqlValue for f32 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Real(v) => Ok(v),
            SqlValue::SmallInt(v) => Ok(f32::from(v)),
            other => Err(ConversionError::mismatch("f32", &other)),
        }
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Double(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Double
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Double(v) => Ok(v),
            SqlValue::Real(v) => Ok(f64::from(v)),
            SqlValue::SmallInt(v) => Ok(f64::from(v)),
            SqlValue::Int(v) => Ok(f64::from(v)),
            other => Err(ConversionError::mismatch("f64", &other)),
        }
    }
}

impl ToSqlValue for Decimal {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Numeric(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Numeric
    }
}

impl FromSqlValue for Decimal {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Numeric(v) => Ok(v),
            SqlValue::SmallInt(v) => Ok(Decimal::from(v)),
            SqlValue::Int(v) => Ok(Decimal::from(v)),
            SqlValue::BigInt(v) => Ok(Decimal::from(v)),
            SqlValue::Text(text) => text.trim().parse().map_err(|e: rust_decimal::Error| {
                ConversionError::Parse {
                    expected: "Decimal",
                    value: text.clone(),
                    reason: e.to_string(),
                }
            }),
            other => Err(ConversionError::mismatch("Decimal", &other)),
        }
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Bool
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Bool(v) => Ok(v),
            other => Err(ConversionError::mismatch("bool", &other)),
        }
    }
}

impl ToSqlValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn sql_type() -> SqlType {
        SqlType::Text
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Text(v) => Ok(v),
            other => Err(ConversionError::mismatch("String", &other)),
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bytes(self.clone())
    }

    fn sql_type() -> SqlType {
        SqlType::Bytes
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Bytes(v) => Ok(v),
            other => Err(ConversionError::mismatch("Vec<u8>", &other)),
        }
    }
}

impl ToSqlValue for Uuid {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Uuid(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Uuid
    }
}

impl FromSqlValue for Uuid {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Uuid(v) => Ok(v),
            SqlValue::Text(text) => Uuid::parse_str(&text).map_err(|e| ConversionError::Parse {
                expected: "Uuid",
                reason: e.to_string(),
                value: text,
            }),
            other => Err(ConversionError::mismatch("Uuid", &other)),
        }
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Date(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Date
    }
}

impl FromSqlValue for NaiveDate {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Date(v) => Ok(v),
            other => Err(ConversionError::mismatch("NaiveDate", &other)),
        }
    }
}

impl ToSqlValue for NaiveTime {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Time(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Time
    }
}

impl FromSqlValue for NaiveTime {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Time(v) => Ok(v),
            other => Err(ConversionError::mismatch("NaiveTime", &other)),
        }
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::Timestamp
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Timestamp(v) => Ok(v),
            SqlValue::TimestampTz(v) => Ok(v.naive_utc()),
            other => Err(ConversionError::mismatch("NaiveDateTime", &other)),
        }
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::TimestampTz(*self)
    }

    fn sql_type() -> SqlType {
        SqlType::TimestampTz
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::TimestampTz(v) => Ok(v),
            SqlValue::Timestamp(v) => Ok(v.and_utc()),
            other => Err(ConversionError::mismatch("DateTime<Utc>", &other)),
        }
    }
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Json(self.clone())
    }

    fn sql_type() -> SqlType {
        SqlType::Json
    }
}

impl FromSqlValue for serde_json::Value {
    fn from_sql_value(value: SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Json(v) => Ok(v),
            other => Err(ConversionError::mismatch("serde_json::Value", &other)),
        }
    }
}
