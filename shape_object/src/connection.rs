use crate::command::Command;
use crate::errors::ShapeError;
use crate::materialize::RowStream;
use async_trait::async_trait;
use type_mapping::SqlValue;

/// The database primitives the mapper runs commands through.
///
/// One logical caller at a time: every method takes `&mut self`, and an open
/// row stream keeps the connection borrowed until it is dropped.
#[async_trait]
pub trait Connection: Send {
    /// Run a statement and return the number of rows affected
    async fn execute(&mut self, command: &Command) -> Result<u64, ShapeError>;

    /// First column of the first row, `None` when no row is returned
    async fn scalar(&mut self, command: &Command) -> Result<Option<SqlValue>, ShapeError>;

    /// Open a cursor over the result rows; dropping the stream releases it
    fn fetch<'c>(&'c mut self, command: Command) -> RowStream<'c>;
}
