//! SQL dialect strategy
//!
//! Everything the statement synthesizer emits that differs between database
//! engines goes through this trait.

use std::fmt::Debug;

pub trait Dialect: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Positional placeholder for the 1-based `position`
    fn placeholder(&self, position: usize) -> String;

    /// Clause returning `columns` from a data-modifying statement
    fn returning(&self, columns: &[&str]) -> String;

    /// Clause skipping rows that conflict on `keys`
    fn on_conflict_ignore(&self, keys: &[&str]) -> String;

    /// Clause overwriting `columns` of rows that conflict on `keys`
    fn on_conflict_update(&self, keys: &[&str], columns: &[&str]) -> String;

    /// Expression that is true for an inserted row and false for an updated one
    fn upsert_outcome(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${}", position)
    }

    fn returning(&self, columns: &[&str]) -> String {
        format!(" RETURNING {}", columns.join(","))
    }

    fn on_conflict_ignore(&self, keys: &[&str]) -> String {
        format!(" ON CONFLICT ({}) DO NOTHING", keys.join(","))
    }

    fn on_conflict_update(&self, keys: &[&str], columns: &[&str]) -> String {
        let assignments = columns
            .iter()
            .map(|c| format!("{c}=EXCLUDED.{c}"))
            .collect::<Vec<_>>()
            .join(",");
        format!(" ON CONFLICT ({}) DO UPDATE SET {}", keys.join(","), assignments)
    }

    fn upsert_outcome(&self) -> &'static str {
        "(xmax = 0)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_clauses() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.placeholder(3), "$3");
        assert_eq!(dialect.returning(&["id", "date_created"]), " RETURNING id,date_created");
        assert_eq!(
            dialect.on_conflict_ignore(&["parent_id", "child_id"]),
            " ON CONFLICT (parent_id,child_id) DO NOTHING"
        );
        assert_eq!(
            dialect.on_conflict_update(&["id"], &["make", "model"]),
            " ON CONFLICT (id) DO UPDATE SET make=EXCLUDED.make,model=EXCLUDED.model"
        );
    }
}
