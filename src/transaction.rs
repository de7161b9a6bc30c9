//! Transaction-backed mappers
//!
//! A mapper over a pool can open a transaction that shares its registry and
//! dialect. Dropping the transaction mapper without committing rolls back.

use shape_object::ShapeError;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::core::Mapper;

impl Mapper<PgPool> {
    /// Start a transaction on a connection from the pool
    pub async fn begin(&self) -> Result<Mapper<Transaction<'static, Postgres>>, ShapeError> {
        let transaction = self.connection.begin().await?;
        debug_log!("Transaction started");
        Ok(Mapper {
            connection: transaction,
            registry: Arc::clone(&self.registry),
            statements: self.statements.clone(),
        })
    }
}

impl<'t> Mapper<Transaction<'t, Postgres>> {
    pub async fn commit(self) -> Result<(), ShapeError> {
        self.connection.commit().await?;
        debug_log!("Transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), ShapeError> {
        self.connection.rollback().await?;
        debug_log!("Transaction rolled back");
        Ok(())
    }
}
