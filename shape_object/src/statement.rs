//! Statement synthesizer
//!
//! Builds the SQL text and bound parameters for every write the mapper
//! performs. Columns and parameters always follow declaration order; table
//! and column names are interpolated verbatim, only values are bound.

use crate::binder::{bind_object, bind_rows};
use crate::command::Command;
use crate::description::{PropertyDescriptor, TypeDescription};
use crate::dialect::{Dialect, PostgresDialect};
use crate::errors::ShapeError;
use crate::parameters::{Arguments, Parameters};
use crate::registry::TypeRegistry;
use crate::shape::Shape;
use std::sync::Arc;

/// What a multi-row insert does with rows that conflict on `keys`
#[derive(Debug, Clone, Copy)]
pub enum OnConflict<'k> {
    /// No conflict clause; the database raises
    Abort,
    /// Skip conflicting rows
    Ignore(&'k [&'k str]),
    /// Overwrite conflicting rows and report per row whether it was inserted
    Update(&'k [&'k str]),
}

#[derive(Debug, Clone)]
pub struct StatementSynthesizer {
    dialect: Arc<dyn Dialect>,
}

impl Default for StatementSynthesizer {
    fn default() -> Self {
        Self::new(Arc::new(PostgresDialect))
    }
}

impl StatementSynthesizer {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// `INSERT INTO t (c1,c2) VALUES (@m1,@m2)`
    pub fn insert<T: Shape>(
        &self,
        registry: &TypeRegistry,
        table: &str,
        data: &T,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        let mut parameters = Parameters::new();
        bind_object(registry, data, &mut parameters)?;
        Ok(Command::new(self.insert_sql(table, &description), parameters))
    }

    /// Insert followed by ` RETURNING columns`
    pub fn insert_returning<T: Shape>(
        &self,
        registry: &TypeRegistry,
        table: &str,
        data: &T,
        returning: &[&str],
    ) -> Result<Command, ShapeError> {
        let mut command = self.insert(registry, table, data)?;
        command.sql.push_str(&self.dialect.returning(returning));
        Ok(command)
    }

    /// Insert into the shape's own table, returning its generated columns if it has any
    pub fn insert_object<T: Shape>(
        &self,
        registry: &TypeRegistry,
        data: &T,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        let generated = db_names(description.generated());
        if generated.is_empty() {
            self.insert(registry, description.table(), data)
        } else {
            self.insert_returning(registry, description.table(), data, &generated)
        }
    }

    /// One multi-row INSERT with row-suffixed parameters and an optional conflict clause
    pub fn insert_rows<T: Shape>(
        &self,
        registry: &TypeRegistry,
        table: &str,
        rows: &[T],
        on_conflict: OnConflict<'_>,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        if rows.is_empty() {
            return Err(ShapeError::InvalidShape(format!(
                "No {} rows to insert into {}",
                description.shape_name(),
                table
            )));
        }

        let readable: Vec<&PropertyDescriptor> = description.readable().collect();
        let mut sql = if readable.is_empty() {
            if rows.len() > 1 {
                return Err(ShapeError::InvalidShape(format!(
                    "{} has no readable members; only one row can be inserted with default values",
                    description.shape_name()
                )));
            }
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let columns = join(readable.iter().map(|p| p.db_name().to_string()));
            let values = join((0..rows.len()).map(|row| {
                format!(
                    "({})",
                    join(readable.iter().map(|p| format!("@{}{}", p.name(), row)))
                )
            }));
            format!("INSERT INTO {} ({}) VALUES {}", table, columns, values)
        };

        match on_conflict {
            OnConflict::Abort => {}
            OnConflict::Ignore(keys) => {
                require_keys(&description, keys)?;
                sql.push_str(&self.dialect.on_conflict_ignore(keys));
            }
            OnConflict::Update(keys) => {
                require_keys(&description, keys)?;
                let mut columns: Vec<&str> = readable
                    .iter()
                    .map(|p| p.db_name())
                    .filter(|column| !keys.contains(column))
                    .collect();
                // Without columns to overwrite, re-assign the keys so every row is returned
                if columns.is_empty() {
                    columns = keys.to_vec();
                }
                sql.push_str(&self.dialect.on_conflict_update(keys, &columns));
                sql.push_str(&self.dialect.returning(&[self.dialect.upsert_outcome()]));
            }
        }

        let mut parameters = Parameters::with_capacity(rows.len() * description.properties().len());
        bind_rows(registry, rows, &mut parameters)?;
        Ok(Command::new(sql, parameters))
    }

    /// `UPDATE t SET c1=@m1,... WHERE <filter>`; `args` override members of `data`
    pub fn update<T: Shape, A: Arguments + ?Sized>(
        &self,
        registry: &TypeRegistry,
        table: &str,
        data: &T,
        filter: &str,
        args: &A,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        let assignments = join(
            description
                .readable()
                .map(|p| format!("{}=@{}", p.db_name(), p.name())),
        );
        if assignments.is_empty() {
            return Err(ShapeError::InvalidShape(format!(
                "{} has no readable members to update",
                description.shape_name()
            )));
        }

        let mut parameters = Parameters::new();
        bind_object(registry, data, &mut parameters)?;
        args.bind_to(registry, &mut parameters)?;

        Ok(Command::new(
            format!("UPDATE {} SET {} WHERE {}", table, assignments, filter),
            parameters,
        ))
    }

    /// Update the row identified by the shape's keys
    pub fn update_object<T: Shape>(
        &self,
        registry: &TypeRegistry,
        data: &T,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        let filter = self.key_filter(&description)?;
        self.update(registry, description.table(), data, &filter, &())
    }

    /// `DELETE FROM t WHERE <filter>`
    pub fn delete<A: Arguments + ?Sized>(
        &self,
        registry: &TypeRegistry,
        table: &str,
        filter: &str,
        args: &A,
    ) -> Result<Command, ShapeError> {
        let mut parameters = Parameters::new();
        args.bind_to(registry, &mut parameters)?;
        Ok(Command::new(
            format!("DELETE FROM {} WHERE {}", table, filter),
            parameters,
        ))
    }

    /// Delete the row identified by the shape's keys
    pub fn delete_object<T: Shape>(
        &self,
        registry: &TypeRegistry,
        data: &T,
    ) -> Result<Command, ShapeError> {
        let description = registry.describe::<T>()?;
        let filter = self.key_filter(&description)?;
        self.delete(registry, description.table(), &filter, data)
    }

    /// `SELECT * FROM t WHERE k1=@k1 AND ...`
    pub fn select_by_keys(&self, description: &TypeDescription) -> Result<String, ShapeError> {
        Ok(format!(
            "SELECT * FROM {} WHERE {}",
            description.table(),
            self.key_filter(description)?
        ))
    }

    /// `k1=@k1 AND k2=@k2` over the shape's keys
    pub fn key_filter(&self, description: &TypeDescription) -> Result<String, ShapeError> {
        if !description.has_keys() {
            return Err(no_keys(description));
        }
        Ok(description
            .keys()
            .map(|p| format!("{}=@{}", p.db_name(), p.name()))
            .collect::<Vec<_>>()
            .join(" AND "))
    }

    /// Column names of the shape's keys, for conflict clauses
    pub fn key_columns<'d>(&self, description: &'d TypeDescription) -> Result<Vec<&'d str>, ShapeError> {
        let keys = db_names(description.keys());
        if keys.is_empty() {
            return Err(no_keys(description));
        }
        Ok(keys)
    }

    fn insert_sql(&self, table: &str, description: &TypeDescription) -> String {
        let readable: Vec<&PropertyDescriptor> = description.readable().collect();
        if readable.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES", table);
        }
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            join(readable.iter().map(|p| p.db_name().to_string())),
            join(readable.iter().map(|p| format!("@{}", p.name())))
        )
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

fn db_names<'d>(properties: impl Iterator<Item = &'d PropertyDescriptor>) -> Vec<&'d str> {
    properties.map(|p| p.db_name()).collect()
}

fn require_keys(description: &TypeDescription, keys: &[&str]) -> Result<(), ShapeError> {
    if keys.is_empty() {
        return Err(ShapeError::InvalidShape(format!(
            "Conflict keys for {} cannot be empty",
            description.shape_name()
        )));
    }
    Ok(())
}

fn no_keys(description: &TypeDescription) -> ShapeError {
    ShapeError::InvalidShape(format!(
        "At least one member of {} must be marked as a key",
        description.shape_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_shapes::{Ambiguous, Car, Document, Person};
    use type_mapping::SqlValue;

    fn setup() -> (TypeRegistry, StatementSynthesizer) {
        (TypeRegistry::new(), StatementSynthesizer::default())
    }

    fn person() -> Person {
        Person {
            id: 0,
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            age: Some(85),
        }
    }

    #[test]
    fn test_insert_uses_readable_members() {
        let (registry, statements) = setup();
        let command = statements.insert(&registry, "persons", &person()).unwrap();
        assert_eq!(
            command.sql,
            "INSERT INTO persons (first_name,last_name,age) VALUES (@first_name,@last_name,@age)"
        );
        assert_eq!(command.parameters.get("age"), Some(&SqlValue::Int(85)));
    }

    #[test]
    fn test_insert_object_returns_generated_columns() {
        let (registry, statements) = setup();
        let command = statements.insert_object(&registry, &person()).unwrap();
        assert_eq!(
            command.sql,
            "INSERT INTO persons (first_name,last_name,age) VALUES (@first_name,@last_name,@age) RETURNING id"
        );

        let command = statements
            .insert_object(&registry, &Document { name: "notes".into() })
            .unwrap();
        assert_eq!(command.sql, "INSERT INTO document (name) VALUES (@name)");
    }

    #[test]
    fn test_insert_rows() {
        let (registry, statements) = setup();
        let cars = vec![Car::new("A1", "Volvo"), Car::new("B2", "Saab")];
        let command = statements
            .insert_rows(&registry, "cars", &cars, OnConflict::Abort)
            .unwrap();
        assert_eq!(
            command.sql,
            "INSERT INTO cars (id,make) VALUES (@id0,@make0),(@id1,@make1)"
        );
        assert_eq!(command.parameters.get("make1"), Some(&SqlValue::Text("Saab".into())));
    }

    #[test]
    fn test_insert_if_missing_clause() {
        let (registry, statements) = setup();
        let cars = vec![Car::new("A1", "Volvo")];
        let command = statements
            .insert_rows(&registry, "cars", &cars, OnConflict::Ignore(&["id"]))
            .unwrap();
        assert_eq!(
            command.sql,
            "INSERT INTO cars (id,make) VALUES (@id0,@make0) ON CONFLICT (id) DO NOTHING"
        );
    }

    #[test]
    fn test_upsert_clause() {
        let (registry, statements) = setup();
        let cars = vec![Car::new("A1", "Volvo")];
        let command = statements
            .insert_rows(&registry, "cars", &cars, OnConflict::Update(&["id"]))
            .unwrap();
        assert_eq!(
            command.sql,
            "INSERT INTO cars (id,make) VALUES (@id0,@make0) ON CONFLICT (id) DO UPDATE SET make=EXCLUDED.make RETURNING (xmax = 0)"
        );
    }

    #[test]
    fn test_upsert_with_only_key_columns_reassigns_keys() {
        let (registry, statements) = setup();
        let rows = vec![Document { name: "a".into() }];
        let command = statements
            .insert_rows(&registry, "document", &rows, OnConflict::Update(&["name"]))
            .unwrap();
        assert!(command
            .sql
            .ends_with("ON CONFLICT (name) DO UPDATE SET name=EXCLUDED.name RETURNING (xmax = 0)"));
    }

    #[test]
    fn test_conflict_keys_required() {
        let (registry, statements) = setup();
        let cars = vec![Car::new("A1", "Volvo")];
        let err = statements
            .insert_rows(&registry, "cars", &cars, OnConflict::Ignore(&[]))
            .unwrap_err();
        assert!(matches!(err, ShapeError::InvalidShape(_)));
    }

    #[test]
    fn test_bulk_suffix_collision_surfaces() {
        let (registry, statements) = setup();
        let rows = vec![Ambiguous::default(); 11];
        let err = statements
            .insert_rows(&registry, "ambiguous", &rows, OnConflict::Abort)
            .unwrap_err();
        assert!(matches!(err, ShapeError::DuplicateName { .. }));
    }

    #[test]
    fn test_update_with_extra_args() {
        let (registry, statements) = setup();
        let car = Car::new("A1", "Volvo");
        let command = statements
            .update(
                &registry,
                "cars",
                &car,
                "id=@old_id",
                &Parameters::new().with("old_id", "Z9").with("make", "Polestar"),
            )
            .unwrap();
        assert_eq!(command.sql, "UPDATE cars SET id=@id,make=@make WHERE id=@old_id");
        assert_eq!(
            command.parameters.get("make"),
            Some(&SqlValue::Text("Polestar".into()))
        );
    }

    #[test]
    fn test_update_and_delete_object() {
        let (registry, statements) = setup();
        let car = Car::new("A1", "Volvo");

        let update = statements.update_object(&registry, &car).unwrap();
        assert_eq!(update.sql, "UPDATE cars SET id=@id,make=@make WHERE id=@id");

        let delete = statements.delete_object(&registry, &car).unwrap();
        assert_eq!(delete.sql, "DELETE FROM cars WHERE id=@id");
        assert_eq!(delete.parameters.get("id"), Some(&SqlValue::Text("A1".into())));
    }

    #[test]
    fn test_object_operations_require_keys() {
        let (registry, statements) = setup();
        let document = Document { name: "draft".into() };

        assert!(matches!(
            statements.update_object(&registry, &document),
            Err(ShapeError::InvalidShape(_))
        ));
        assert!(matches!(
            statements.delete_object(&registry, &document),
            Err(ShapeError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_select_by_keys() {
        let (registry, statements) = setup();
        let description = registry.describe::<Car>().unwrap();
        assert_eq!(
            statements.select_by_keys(&description).unwrap(),
            "SELECT * FROM cars WHERE id=@id"
        );
    }
}
