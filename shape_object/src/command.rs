//! Commands
//!
//! A `Command` is SQL text with `@name` placeholders and the parameters bound
//! for it. Connections turn it into positional form right before execution.

use crate::dialect::Dialect;
use crate::errors::ShapeError;
use crate::parameters::Parameters;
use std::collections::HashMap;
use type_mapping::SqlValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub sql: String,
    pub parameters: Parameters,
}

/// A command rewritten to the dialect's positional placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalCommand {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl Command {
    pub fn new(sql: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    /// Command without parameters
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Parameters::new())
    }

    /// Replace every `@name` outside quotes, dollar quotes and comments with a
    /// positional placeholder. Repeated names share one position; parameters the SQL
    /// never mentions are not sent.
    pub fn to_positional(&self, dialect: &dyn Dialect) -> Result<PositionalCommand, ShapeError> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut values = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        let source = self.sql.as_str();
        let bytes = source.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let rest = &source[i..];
            let skipped = match bytes[i] {
                b'\'' => quoted_len(rest, b'\''),
                b'E' | b'e' if rest[1..].starts_with('\'') && !follows_identifier(source, i) => {
                    1 + escaped_quoted_len(&rest[1..])
                }
                b'$' if !follows_identifier(source, i) => dollar_quoted_len(rest).unwrap_or(1),
                b'"' => quoted_len(rest, b'"'),
                b'-' if rest.starts_with("--") => rest.find('\n').unwrap_or(rest.len()),
                b'/' if rest.starts_with("/*") => rest.find("*/").map_or(rest.len(), |end| end + 2),
                // `@@` is an operator, not a placeholder
                b'@' if rest.starts_with("@@") => 2,
                b'@' => {
                    let name_len = identifier_len(&rest[1..]);
                    if name_len == 0 {
                        1
                    } else {
                        let name = &rest[1..1 + name_len];
                        let position = match positions.get(name) {
                            Some(&position) => position,
                            None => {
                                let value = self
                                    .parameters
                                    .get(name)
                                    .ok_or_else(|| ShapeError::MissingParameter(name.to_string()))?;
                                values.push(value.clone());
                                positions.insert(name, values.len());
                                values.len()
                            }
                        };
                        sql.push_str(&dialect.placeholder(position));
                        i += 1 + name_len;
                        continue;
                    }
                }
                _ => rest.chars().next().map_or(1, char::len_utf8),
            };
            sql.push_str(&rest[..skipped]);
            i += skipped;
        }

        Ok(PositionalCommand { sql, values })
    }
}

/// Length of a quoted run starting at `text[0]`, doubled quotes included
fn quoted_len(text: &str, quote: u8) -> usize {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Length of an `E'...'` body starting at `text[0]`, backslash escapes included
fn escaped_quoted_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b'\'' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Length of a `$tag$...$tag$` run, or `None` when `text` does not open one.
/// `$1` is not a tag.
fn dollar_quoted_len(text: &str) -> Option<usize> {
    let tag_len = text[1..].find('$')?;
    let tag = &text[1..1 + tag_len];
    if identifier_len(tag) != tag.len() {
        return None;
    }
    let delimiter = &text[..tag_len + 2];
    let body = &text[delimiter.len()..];
    Some(body.find(delimiter).map_or(text.len(), |end| 2 * delimiter.len() + end))
}

fn follows_identifier(source: &str, at: usize) -> bool {
    source[..at]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn identifier_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(idx, _)| idx)
}
