//! Core rowshape functionality
//!
//! This module contains the `Mapper` struct: a connection paired with the
//! shared type-description cache and the statement synthesizer, plus the
//! raw query entry points every other operation is built on.

use futures::TryStreamExt;
use shape_object::materialize::{arrays, assoc, failed, shapes};
use shape_object::{
    ArrayStream, Arguments, AssocStream, Command, Connection, Dialect, FromSqlValue, Parameters,
    PostgresDialect, Shape, ShapeError, ShapeStream, StatementSynthesizer, TypeRegistry,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::RowShapeError;
use config::{AppConfig, DialectKind};

/// Maps shapes onto SQL statements run through one connection
///
/// Every method takes `&mut self`: one logical caller per connection, and a
/// result stream keeps the mapper borrowed until it is dropped.
pub struct Mapper<C> {
    pub(crate) connection: C,
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) statements: StatementSynthesizer,
}

impl Mapper<PgPool> {
    /// Open a PostgreSQL pool with the configured limits
    pub async fn connect(config: &AppConfig) -> Result<Self, RowShapeError> {
        let database = &config.database;
        let connection_string = database.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        debug_log!(
            "Connected to {}:{}/{} using the {} dialect",
            database.host,
            database.port,
            database.database,
            config.mapper.dialect
        );

        Ok(Self::with_dialect(
            pool,
            Arc::new(TypeRegistry::new()),
            dialect_for(config.mapper.dialect),
        ))
    }
}

fn dialect_for(kind: DialectKind) -> Arc<dyn Dialect> {
    match kind {
        DialectKind::Postgres => Arc::new(PostgresDialect),
    }
}

impl<C: Connection> Mapper<C> {
    /// Mapper with its own registry and the PostgreSQL dialect
    pub fn new(connection: C) -> Self {
        Self::with_registry(connection, Arc::new(TypeRegistry::new()))
    }

    /// Mapper sharing an existing registry
    pub fn with_registry(connection: C, registry: Arc<TypeRegistry>) -> Self {
        Self {
            connection,
            registry,
            statements: StatementSynthesizer::default(),
        }
    }

    pub fn with_dialect(connection: C, registry: Arc<TypeRegistry>, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            connection,
            registry,
            statements: StatementSynthesizer::new(dialect),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn statements(&self) -> &StatementSynthesizer {
        &self.statements
    }

    /// Run a statement, returning the number of rows affected
    pub async fn execute<A: Arguments + ?Sized>(&mut self, sql: &str, args: &A) -> Result<u64, ShapeError> {
        let command = self.command(sql, args)?;
        self.connection.execute(&command).await
    }

    /// First column of the first row, converted to `T`
    pub async fn scalar<T: FromSqlValue, A: Arguments + ?Sized>(
        &mut self,
        sql: &str,
        args: &A,
    ) -> Result<T, ShapeError> {
        let command = self.command(sql, args)?;
        let value = self
            .connection
            .scalar(&command)
            .await?
            .ok_or(ShapeError::EmptyResult)?;
        Ok(T::from_sql_value(value)?)
    }

    /// Lazily materialize each result row as a `T`
    ///
    /// Columns are matched to members by member name or column name;
    /// anything without a writeable member is ignored.
    pub fn query<T: Shape + Default, A: Arguments + ?Sized>(
        &mut self,
        sql: &str,
        args: &A,
    ) -> ShapeStream<'_, T> {
        let prepared = self
            .registry
            .describe::<T>()
            .and_then(|description| Ok((description, self.command(sql, args)?)));
        match prepared {
            Ok((description, command)) => shapes(description, self.connection.fetch(command)),
            Err(e) => failed(e),
        }
    }

    /// Each result row as column name → value, in result column order
    pub fn query_assoc<A: Arguments + ?Sized>(&mut self, sql: &str, args: &A) -> AssocStream<'_> {
        match self.command(sql, args) {
            Ok(command) => assoc(self.connection.fetch(command)),
            Err(e) => failed(e),
        }
    }

    /// Each result row as its values, in result column order
    pub fn query_array<A: Arguments + ?Sized>(&mut self, sql: &str, args: &A) -> ArrayStream<'_> {
        match self.command(sql, args) {
            Ok(command) => arrays(self.connection.fetch(command)),
            Err(e) => failed(e),
        }
    }

    pub async fn fetch_all<T: Shape + Default, A: Arguments + ?Sized>(
        &mut self,
        sql: &str,
        args: &A,
    ) -> Result<Vec<T>, ShapeError> {
        self.query(sql, args).try_collect().await
    }

    /// The first row, if any; the cursor is released before returning
    pub async fn fetch_optional<T: Shape + Default, A: Arguments + ?Sized>(
        &mut self,
        sql: &str,
        args: &A,
    ) -> Result<Option<T>, ShapeError> {
        let mut rows = self.query(sql, args);
        rows.try_next().await
    }

    pub(crate) fn command<A: Arguments + ?Sized>(&self, sql: &str, args: &A) -> Result<Command, ShapeError> {
        let mut parameters = Parameters::new();
        args.bind_to(&self.registry, &mut parameters)?;
        Ok(Command::new(sql, parameters))
    }
}
