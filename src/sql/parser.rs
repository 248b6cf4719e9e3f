//! Parser collaborator contract.
//!
//! SQL text parsing lives outside this crate. An embedding application plugs
//! in a [`StatementParser`] that turns query text into a [`Statement`] tree;
//! failures come back as [`ParseError`] and are routed through the
//! executor's [`ErrorReporter`](crate::executor::ErrorReporter).

use thiserror::Error;

use super::ast::Statement;

/// Failure to turn query text into a [`Statement`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Human readable reason
    pub message: String,
    /// Byte offset into the query text, when known
    pub position: Option<usize>,
}

impl ParseError {
    /// Error without a position.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Error pointing at a byte offset.
    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

/// Turns query text into a statement tree.
///
/// Implementations must be `Send + Sync`; one parser is shared by every
/// connection.
pub trait StatementParser: Send + Sync {
    /// Parse a single statement.
    fn parse(&self, sql: &str) -> Result<Statement, ParseError>;
}
