//! PostgreSQL connection adapter
//!
//! Implements `Connection` for `PgPool`, `PgConnection` and
//! `Transaction<'_, Postgres>` on top of sqlx.

mod bind;
mod decode;

use crate::command::{Command, PositionalCommand};
use crate::connection::Connection;
use crate::dialect::PostgresDialect;
use crate::errors::ShapeError;
use crate::materialize::{Row, RowStream};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use sqlx::{Executor, PgConnection, PgPool, Postgres, Row as _, Transaction};
use std::sync::Arc;
use type_mapping::SqlValue;

pub use bind::bind_arguments;
pub use decode::{decode_column, decode_row};

fn prepare(command: &Command) -> Result<PositionalCommand, ShapeError> {
    let positional = command.to_positional(&PostgresDialect)?;
    tracing::debug!(
        "Executing: {} ({} parameters)",
        positional.sql,
        positional.values.len()
    );
    Ok(positional)
}

async fn execute_on<'c, E>(executor: E, command: &Command) -> Result<u64, ShapeError>
where
    E: Executor<'c, Database = Postgres>,
{
    let positional = prepare(command)?;
    let arguments = bind_arguments(&positional.values)?;
    let result = sqlx::query_with(&positional.sql, arguments)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

async fn scalar_on<'c, E>(executor: E, command: &Command) -> Result<Option<SqlValue>, ShapeError>
where
    E: Executor<'c, Database = Postgres>,
{
    let positional = prepare(command)?;
    let arguments = bind_arguments(&positional.values)?;
    let row = sqlx::query_with(&positional.sql, arguments)
        .fetch_optional(executor)
        .await?;
    match row {
        // `SELECT` with no target list still yields a row
        Some(row) if !row.is_empty() => decode_column(&row, 0).map(Some),
        _ => Ok(None),
    }
}

fn fetch_on<'c, E>(executor: E, command: Command) -> RowStream<'c>
where
    E: Executor<'c, Database = Postgres> + Send + 'c,
{
    boxed(async_stream::try_stream! {
        let positional = prepare(&command)?;
        let arguments = bind_arguments(&positional.values)?;
        let mut rows = sqlx::query_with(&positional.sql, arguments).fetch(executor);
        let mut columns: Option<Arc<[String]>> = None;

        while let Some(row) = rows.try_next().await? {
            let names = columns
                .get_or_insert_with(|| decode::column_names(&row))
                .clone();
            yield decode_row(&row, names)?;
        }
    })
}

fn boxed<'c, S>(stream: S) -> RowStream<'c>
where
    S: Stream<Item = Result<Row, ShapeError>> + Send + 'c,
{
    Box::pin(stream)
}

#[async_trait]
impl Connection for PgPool {
    async fn execute(&mut self, command: &Command) -> Result<u64, ShapeError> {
        execute_on(&*self, command).await
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<SqlValue>, ShapeError> {
        scalar_on(&*self, command).await
    }

    fn fetch<'c>(&'c mut self, command: Command) -> RowStream<'c> {
        fetch_on(&*self, command)
    }
}

#[async_trait]
impl Connection for PgConnection {
    async fn execute(&mut self, command: &Command) -> Result<u64, ShapeError> {
        execute_on(&mut *self, command).await
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<SqlValue>, ShapeError> {
        scalar_on(&mut *self, command).await
    }

    fn fetch<'c>(&'c mut self, command: Command) -> RowStream<'c> {
        fetch_on(&mut *self, command)
    }
}

#[async_trait]
impl<'t> Connection for Transaction<'t, Postgres> {
    async fn execute(&mut self, command: &Command) -> Result<u64, ShapeError> {
        execute_on(&mut **self, command).await
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<SqlValue>, ShapeError> {
        scalar_on(&mut **self, command).await
    }

    fn fetch<'c>(&'c mut self, command: Command) -> RowStream<'c> {
        fetch_on(&mut **self, command)
    }
}
