use crate::errors::ShapeError;
use crate::materialize::Row;
use sqlx::postgres::PgRow;
use sqlx::{Column, Decode, Postgres, Row as _, Type, TypeInfo};
use std::sync::Arc;
use type_mapping::{pg_type_to_sql_type, SqlType, SqlValue};

pub(crate) fn column_names(row: &PgRow) -> Arc<[String]> {
    row.columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect::<Vec<_>>()
        .into()
}

/// Decode every column of `row`
pub fn decode_row(row: &PgRow, columns: Arc<[String]>) -> Result<Row, ShapeError> {
    let values = (0..row.len())
        .map(|idx| decode_column(row, idx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Row::new(columns, values))
}

/// Decode one column by its server-reported type name
pub fn decode_column(row: &PgRow, idx: usize) -> Result<SqlValue, ShapeError> {
    let column = row.try_column(idx)?;
    let type_name = column.type_info().name();

    // Unmapped types decode only when the server type is text-compatible
    let Some(sql_type) = pg_type_to_sql_type(type_name) else {
        let text: Option<String> = row.try_get(idx).inspect_err(|_| {
            tracing::warn!(
                "Unsupported PostgreSQL type {} for column '{}'",
                type_name,
                column.name()
            )
        })?;
        return Ok(text.map_or(SqlValue::Null(SqlType::Text), SqlValue::Text));
    };

    match sql_type {
        SqlType::Bool => optional(row, idx, sql_type, SqlValue::Bool),
        SqlType::SmallInt => optional(row, idx, sql_type, SqlValue::SmallInt),
        SqlType::Int => optional(row, idx, sql_type, SqlValue::Int),
        SqlType::BigInt => optional(row, idx, sql_type, SqlValue::BigInt),
        SqlType::Real => optional(row, idx, sql_type, SqlValue::Real),
        SqlType::Double => optional(row, idx, sql_type, SqlValue::Double),
        SqlType::Numeric => optional(row, idx, sql_type, SqlValue::Numeric),
        SqlType::Text => optional(row, idx, sql_type, SqlValue::Text),
        SqlType::Bytes => optional(row, idx, sql_type, SqlValue::Bytes),
        SqlType::Uuid => optional(row, idx, sql_type, SqlValue::Uuid),
        SqlType::Date => optional(row, idx, sql_type, SqlValue::Date),
        SqlType::Time => optional(row, idx, sql_type, SqlValue::Time),
        SqlType::Timestamp => optional(row, idx, sql_type, SqlValue::Timestamp),
        SqlType::TimestampTz => optional(row, idx, sql_type, SqlValue::TimestampTz),
        SqlType::Json => optional(row, idx, sql_type, SqlValue::Json),
    }
}

fn optional<'r, T>(
    row: &'r PgRow,
    idx: usize,
    sql_type: SqlType,
    wrap: fn(T) -> SqlValue,
) -> Result<SqlValue, ShapeError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    let value: Option<T> = row.try_get(idx)?;
    Ok(value.map_or(SqlValue::Null(sql_type), wrap))
}
