//! In-memory connection for tests
//!
//! `MockConnection` records every command it receives and replays scripted
//! responses in order. Commands are validated the same way the PostgreSQL
//! adapter validates them, so an unbound placeholder fails here too.

use crate::command::Command;
use crate::connection::Connection;
use crate::dialect::PostgresDialect;
use crate::errors::ShapeError;
use crate::materialize::{failed, Row, RowStream};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use type_mapping::SqlValue;

/// A scripted result for the next command
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Rows affected by `execute`
    Affected(u64),
    /// Result of `scalar`
    Scalar(Option<SqlValue>),
    /// Result set for `fetch` (and for `scalar`, which takes its first value)
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<SqlValue>>,
    },
    /// Fail the command with a database error carrying this message
    Fail(String),
}

impl MockResponse {
    pub fn rows(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
        MockResponse::Rows {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockConnection {
    commands: Vec<Command>,
    responses: VecDeque<MockResponse>,
    open_cursors: Arc<AtomicUsize>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered command
    pub fn respond(&mut self, response: MockResponse) -> &mut Self {
        self.responses.push_back(response);
        self
    }

    pub fn with_response(mut self, response: MockResponse) -> Self {
        self.respond(response);
        self
    }

    /// Every command received so far, in order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn last_command(&self) -> Option<&Command> {
        self.commands.last()
    }

    /// Result streams currently alive
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Shared handle on the open-cursor count, readable while a stream borrows the connection
    pub fn cursor_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.open_cursors)
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }

    fn receive(&mut self, command: Command) -> Result<Option<MockResponse>, ShapeError> {
        command.to_positional(&PostgresDialect)?;
        tracing::debug!("Mock received: {}", command.sql);
        self.commands.push(command);
        match self.responses.pop_front() {
            Some(MockResponse::Fail(message)) => {
                Err(ShapeError::Database(sqlx::Error::Protocol(message)))
            }
            other => Ok(other),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&mut self, command: &Command) -> Result<u64, ShapeError> {
        Ok(match self.receive(command.clone())? {
            Some(MockResponse::Affected(count)) => count,
            Some(MockResponse::Rows { rows, .. }) => rows.len() as u64,
            _ => 0,
        })
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<SqlValue>, ShapeError> {
        Ok(match self.receive(command.clone())? {
            Some(MockResponse::Scalar(value)) => value,
            Some(MockResponse::Rows { rows, .. }) => {
                rows.into_iter().next().and_then(|row| row.into_iter().next())
            }
            _ => None,
        })
    }

    fn fetch<'c>(&'c mut self, command: Command) -> RowStream<'c> {
        let (columns, rows) = match self.receive(command) {
            Ok(Some(MockResponse::Rows { columns, rows })) => (columns, rows),
            Ok(_) => (Vec::new(), Vec::new()),
            Err(e) => return failed(e),
        };

        let columns: Arc<[String]> = columns.into();
        let cursor = CursorGuard::open(Arc::clone(&self.open_cursors));
        futures::stream::iter(rows)
            .map(move |values| {
                let _open = &cursor;
                Ok(Row::new(Arc::clone(&columns), values))
            })
            .boxed()
    }
}

/// Counts a stream as open until it is dropped
struct CursorGuard(Arc<AtomicUsize>);

impl CursorGuard {
    fn open(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let mut connection = MockConnection::new()
            .with_response(MockResponse::Affected(3))
            .with_response(MockResponse::Scalar(Some(SqlValue::BigInt(9))));

        let affected = connection.execute(&Command::raw("DELETE FROM cars")).await.unwrap();
        let scalar = connection
            .scalar(&Command::raw("SELECT count(*) FROM cars"))
            .await
            .unwrap();

        assert_eq!(affected, 3);
        assert_eq!(scalar, Some(SqlValue::BigInt(9)));
        assert_eq!(connection.commands().len(), 2);
        assert_eq!(connection.pending_responses(), 0);
    }

    #[tokio::test]
    async fn test_unbound_placeholder_rejected() {
        let mut connection = MockConnection::new();
        let err = connection
            .execute(&Command::raw("DELETE FROM cars WHERE id=@id"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShapeError::MissingParameter(_)));
        assert!(connection.commands().is_empty());
    }

    #[tokio::test]
    async fn test_cursor_released_on_drop() {
        let mut connection = MockConnection::new().with_response(MockResponse::rows(
            &["id"],
            vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
        ));

        let counter = connection.cursor_counter();
        {
            let mut rows = connection.fetch(Command::new(
                "SELECT id FROM t WHERE id > @min",
                Parameters::new().with("min", 0),
            ));
            let first = rows.try_next().await.unwrap();
            assert!(first.is_some());
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }

        assert_eq!(connection.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_failure_response() {
        let mut connection =
            MockConnection::new().with_response(MockResponse::Fail("duplicate key".into()));
        let err = connection.execute(&Command::raw("INSERT INTO t DEFAULT VALUES")).await.unwrap_err();
        assert!(matches!(err, ShapeError::Database(_)));
    }
}
