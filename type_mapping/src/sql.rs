//! SQL type name utilities
//!
//! This module maps between `SqlType` and PostgreSQL type names.

use crate::types::SqlType;

/// Map a PostgreSQL type name (as reported by the server) to a SqlType
pub fn pg_type_to_sql_type(pg_type: &str) -> Option<SqlType> {
    // Normalize to upper case without surrounding whitespace for consistent matching
    let normalized = pg_type.trim().to_ascii_uppercase();
    match normalized.as_str() {
        "BOOL" | "BOOLEAN" => Some(SqlType::Bool),
        "INT2" | "SMALLINT" | "SMALLSERIAL" => Some(SqlType::SmallInt),
        "INT4" | "INT" | "INTEGER" | "SERIAL" => Some(SqlType::Int),
        "INT8" | "BIGINT" | "BIGSERIAL" => Some(SqlType::BigInt),
        "FLOAT4" | "REAL" => Some(SqlType::Real),
        "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" => Some(SqlType::Double),
        "NUMERIC" | "DECIMAL" => Some(SqlType::Numeric),
        "TEXT" | "VARCHAR" | "CHARACTER VARYING" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            Some(SqlType::Text)
        }
        "BYTEA" => Some(SqlType::Bytes),
        "UUID" => Some(SqlType::Uuid),
        "DATE" => Some(SqlType::Date),
        "TIME" | "TIME WITHOUT TIME ZONE" => Some(SqlType::Time),
        "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" => Some(SqlType::Timestamp),
        "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => Some(SqlType::TimestampTz),
        "JSON" | "JSONB" => Some(SqlType::Json),
        _ => None,
    }
}

/// Canonical PostgreSQL type name for a SqlType
pub fn sql_type_to_pg_type(sql_type: SqlType) -> &'static str {
    match sql_type {
        SqlType::Bool => "BOOLEAN",
        SqlType::SmallInt => "SMALLINT",
        SqlType::Int => "INTEGER",
        SqlType::BigInt => "BIGINT",
        SqlType::Real => "REAL",
        SqlType::Double => "DOUBLE PRECISION",
        SqlType::Numeric => "NUMERIC",
        SqlType::Text => "TEXT",
        SqlType::Bytes => "BYTEA",
        SqlType::Uuid => "UUID",
        SqlType::Date => "DATE",
        SqlType::Time => "TIME",
        SqlType::Timestamp => "TIMESTAMP",
        SqlType::TimestampTz => "TIMESTAMP WITH TIME ZONE",
        SqlType::Json => "JSONB",
    }
}
