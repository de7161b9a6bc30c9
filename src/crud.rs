//! Table-level writes
//!
//! The caller names the table (and, for conflict handling, the key columns);
//! shapes only supply columns and values.

use futures::{StreamExt, TryStreamExt};
use shape_object::{
    Arguments, Command, Connection, FromSqlValue, OnConflict, Shape, ShapeError, SqlType, SqlValue,
};

use crate::core::Mapper;

impl<C: Connection> Mapper<C> {
    /// Insert `data` into `table`, returning rows affected
    pub async fn insert<T: Shape>(&mut self, table: &str, data: &T) -> Result<u64, ShapeError> {
        let command = self.statements.insert(&self.registry, table, data)?;
        self.connection.execute(&command).await
    }

    /// Insert `data` into `table` and return the `returning` column of the new row
    pub async fn insert_returning<T: Shape, K: FromSqlValue>(
        &mut self,
        table: &str,
        data: &T,
        returning: &str,
    ) -> Result<K, ShapeError> {
        let command = self
            .statements
            .insert_returning(&self.registry, table, data, &[returning])?;
        let value = self
            .connection
            .scalar(&command)
            .await?
            .ok_or(ShapeError::EmptyResult)?;
        Ok(K::from_sql_value(value)?)
    }

    /// Insert every row in one statement
    pub async fn insert_many<T: Shape>(&mut self, table: &str, rows: &[T]) -> Result<u64, ShapeError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let command = self
            .statements
            .insert_rows(&self.registry, table, rows, OnConflict::Abort)?;
        self.connection.execute(&command).await
    }

    /// Insert the rows that do not conflict on `keys`, returning how many were inserted
    pub async fn insert_if_missing<T: Shape>(
        &mut self,
        table: &str,
        rows: &[T],
        keys: &[&str],
    ) -> Result<u64, ShapeError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let command = self
            .statements
            .insert_rows(&self.registry, table, rows, OnConflict::Ignore(keys))?;
        self.connection.execute(&command).await
    }

    /// Insert or overwrite every row, conflicting on `keys`
    ///
    /// Returns one flag per row, in input order: `true` when the row was
    /// inserted, `false` when an existing row was updated.
    pub async fn upsert<T: Shape>(
        &mut self,
        table: &str,
        rows: &[T],
        keys: &[&str],
    ) -> Result<Vec<bool>, ShapeError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let command = self
            .statements
            .insert_rows(&self.registry, table, rows, OnConflict::Update(keys))?;
        self.outcomes(command).await
    }

    /// `UPDATE table SET ... WHERE filter`; `args` override members of `data`
    pub async fn update<T: Shape, A: Arguments + ?Sized>(
        &mut self,
        table: &str,
        data: &T,
        filter: &str,
        args: &A,
    ) -> Result<u64, ShapeError> {
        let command = self
            .statements
            .update(&self.registry, table, data, filter, args)?;
        self.connection.execute(&command).await
    }

    /// `DELETE FROM table WHERE filter`
    pub async fn delete_where<A: Arguments + ?Sized>(
        &mut self,
        table: &str,
        filter: &str,
        args: &A,
    ) -> Result<u64, ShapeError> {
        let command = self.statements.delete(&self.registry, table, filter, args)?;
        self.connection.execute(&command).await
    }

    /// Read the per-row upsert outcome column
    pub(crate) async fn outcomes(&mut self, command: Command) -> Result<Vec<bool>, ShapeError> {
        self.connection
            .fetch(command)
            .map(|row| -> Result<bool, ShapeError> {
                let value = row?
                    .into_first()
                    .unwrap_or(SqlValue::Null(SqlType::Bool));
                Ok(bool::from_sql_value(value)?)
            })
            .try_collect()
            .await
    }
}
