//! Object-level operations
//!
//! The shape's own description supplies the table, the key filter and the
//! conflict columns.

use futures::TryStreamExt;
use shape_object::materialize::{assign, materialize};
use shape_object::{
    Command, Connection, OnConflict, Parameters, Shape, ShapeError, ToSqlValue,
};

use crate::core::Mapper;

impl<C: Connection> Mapper<C> {
    /// Load the row whose keys equal `ids`, bound to the keys in declaration order
    pub async fn get<T: Shape + Default>(
        &mut self,
        ids: &[&dyn ToSqlValue],
    ) -> Result<Option<T>, ShapeError> {
        let description = self.registry.describe::<T>()?;
        let sql = self.statements.select_by_keys(&description)?;

        let keys: Vec<&str> = description.keys().map(|p| p.name()).collect();
        if keys.len() != ids.len() {
            return Err(ShapeError::InvalidShape(format!(
                "{} has {} key member(s) but {} id value(s) were supplied",
                description.shape_name(),
                keys.len(),
                ids.len()
            )));
        }

        let parameters: Parameters = keys
            .into_iter()
            .zip(ids)
            .map(|(name, id)| (name, id.to_sql_value()))
            .collect();

        let row = {
            let mut rows = self.connection.fetch(Command::new(sql, parameters));
            rows.try_next().await?
        };
        row.map(|row| materialize(&description, row)).transpose()
    }

    /// Insert `data` into its table
    ///
    /// When the shape has generated members their values are read back from
    /// the new row and written onto `data`.
    pub async fn insert_object<T: Shape>(&mut self, data: &mut T) -> Result<u64, ShapeError> {
        let description = self.registry.describe::<T>()?;
        let command = self.statements.insert_object(&self.registry, &*data)?;
        if !description.has_generated() {
            return self.connection.execute(&command).await;
        }

        let row = {
            let mut rows = self.connection.fetch(command);
            rows.try_next().await?
        };
        let row = row.ok_or(ShapeError::EmptyResult)?;
        trace_log!(
            "Writing {} generated column(s) back onto {}",
            row.columns().len(),
            description.shape_name()
        );
        assign(&description, data, row)?;
        Ok(1)
    }

    /// Insert every object into its table in one statement
    pub async fn insert_objects<T: Shape>(&mut self, rows: &[T]) -> Result<u64, ShapeError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let description = self.registry.describe::<T>()?;
        let command = self.statements.insert_rows(
            &self.registry,
            description.table(),
            rows,
            OnConflict::Abort,
        )?;
        self.connection.execute(&command).await
    }

    /// Insert `data` unless a row with its keys exists; `true` when inserted
    pub async fn insert_object_if_missing<T: Shape>(&mut self, data: &T) -> Result<bool, ShapeError> {
        let inserted = self.insert_objects_if_missing(std::slice::from_ref(data)).await?;
        Ok(inserted > 0)
    }

    /// Insert the objects whose keys are not present, returning how many were inserted
    pub async fn insert_objects_if_missing<T: Shape>(&mut self, rows: &[T]) -> Result<u64, ShapeError> {
        let description = self.registry.describe::<T>()?;
        let keys = self.statements.key_columns(&description)?;
        if rows.is_empty() {
            return Ok(0);
        }
        let command = self.statements.insert_rows(
            &self.registry,
            description.table(),
            rows,
            OnConflict::Ignore(&keys),
        )?;
        self.connection.execute(&command).await
    }

    /// Insert or overwrite `data` by its keys; `true` when inserted
    pub async fn upsert_object<T: Shape>(&mut self, data: &T) -> Result<bool, ShapeError> {
        let outcomes = self.upsert_objects(std::slice::from_ref(data)).await?;
        outcomes.into_iter().next().ok_or(ShapeError::EmptyResult)
    }

    /// Insert or overwrite every object by its keys, one flag per object in input order
    pub async fn upsert_objects<T: Shape>(&mut self, rows: &[T]) -> Result<Vec<bool>, ShapeError> {
        let description = self.registry.describe::<T>()?;
        let keys = self.statements.key_columns(&description)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let command = self.statements.insert_rows(
            &self.registry,
            description.table(),
            rows,
            OnConflict::Update(&keys),
        )?;
        self.outcomes(command).await
    }

    /// Update the row identified by the keys of `data`
    pub async fn update_object<T: Shape>(&mut self, data: &T) -> Result<u64, ShapeError> {
        let command = self.statements.update_object(&self.registry, data)?;
        self.connection.execute(&command).await
    }

    /// Delete the row identified by the keys of `data`
    pub async fn delete_object<T: Shape>(&mut self, data: &T) -> Result<u64, ShapeError> {
        let command = self.statements.delete_object(&self.registry, data)?;
        self.connection.execute(&command).await
    }
}
