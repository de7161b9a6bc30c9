use crate::errors::ShapeError;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;
use type_mapping::{SqlType, SqlValue};

/// Bind positional values, NULLs as NULLs of their declared type
pub fn bind_arguments(values: &[SqlValue]) -> Result<PgArguments, ShapeError> {
    let mut arguments = PgArguments::default();
    for value in values {
        bind_value(&mut arguments, value)?;
    }
    Ok(arguments)
}

fn bind_value(arguments: &mut PgArguments, value: &SqlValue) -> Result<(), ShapeError> {
    let result = match value {
        SqlValue::Null(ty) => bind_null(arguments, *ty),
        SqlValue::Bool(v) => arguments.add(*v),
        SqlValue::SmallInt(v) => arguments.add(*v),
        SqlValue::Int(v) => arguments.add(*v),
        SqlValue::BigInt(v) => arguments.add(*v),
        SqlValue::Real(v) => arguments.add(*v),
        SqlValue::Double(v) => arguments.add(*v),
        SqlValue::Numeric(v) => arguments.add(*v),
        SqlValue::Text(v) => arguments.add(v.clone()),
        SqlValue::Bytes(v) => arguments.add(v.clone()),
        SqlValue::Uuid(v) => arguments.add(*v),
        SqlValue::Date(v) => arguments.add(*v),
        SqlValue::Time(v) => arguments.add(*v),
        SqlValue::Timestamp(v) => arguments.add(*v),
        SqlValue::TimestampTz(v) => arguments.add(*v),
        SqlValue::Json(v) => arguments.add(v.clone()),
    };
    result.map_err(|e| ShapeError::Database(sqlx::Error::Encode(e)))
}

fn bind_null(arguments: &mut PgArguments, ty: SqlType) -> Result<(), sqlx::error::BoxDynError> {
    match ty {
        SqlType::Bool => arguments.add(Option::<bool>::None),
        SqlType::SmallInt => arguments.add(Option::<i16>::None),
        SqlType::Int => arguments.add(Option::<i32>::None),
        SqlType::BigInt => arguments.add(Option::<i64>::None),
        SqlType::Real => arguments.add(Option::<f32>::None),
        SqlType::Double => arguments.add(Option::<f64>::None),
        SqlType::Numeric => arguments.add(Option::<rust_decimal::Decimal>::None),
        SqlType::Text => arguments.add(Option::<String>::None),
        SqlType::Bytes => arguments.add(Option::<Vec<u8>>::None),
        SqlType::Uuid => arguments.add(Option::<uuid::Uuid>::None),
        SqlType::Date => arguments.add(Option::<chrono::NaiveDate>::None),
        SqlType::Time => arguments.add(Option::<chrono::NaiveTime>::None),
        SqlType::Timestamp => arguments.add(Option::<chrono::NaiveDateTime>::None),
        SqlType::TimestampTz => arguments.add(Option::<chrono::DateTime<chrono::Utc>>::None),
        SqlType::Json => arguments.add(Option::<serde_json::Value>::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_every_value_kind() {
        let values = vec![
            SqlValue::Text("Volvo".into()),
            SqlValue::Null(SqlType::TimestampTz),
            SqlValue::BigInt(42),
            SqlValue::Json(serde_json::json!({"doors": 5})),
            SqlValue::Numeric(rust_decimal::Decimal::new(1999, 2)),
            SqlValue::Null(SqlType::Numeric),
        ];
        let arguments = bind_arguments(&values).unwrap();
        assert_eq!(arguments.len(), 6);
    }
}
