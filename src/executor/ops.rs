//! Capability traits and the stock parts that fill unset capabilities.
//!
//! Every trait method has a default that fails with
//! [`ServerError::NotImplemented`], so a backend overrides only what it
//! supports and the dispatch layer can tell "unsupported" apart from a real
//! failure.

use async_trait::async_trait;

use crate::error::{Result, ServerError};
use crate::server::Connection;
use crate::sql::{
    AlterDatabase, AlterTable, Begin, Commit, CreateDatabase, CreateTable, Delete, DropDatabase,
    DropTable, Insert, ParseError, Rollback, Select, Update, Use,
};

use super::ResultSet;

fn not_implemented(kind: &str) -> ServerError {
    ServerError::NotImplemented(format!("{} is not implemented by this backend", kind))
}

/// Schema statements.
#[async_trait]
pub trait SchemaOps: Send + Sync {
    async fn create_database(&self, _conn: &dyn Connection, _stmt: &CreateDatabase) -> Result<()> {
        Err(not_implemented("CREATE DATABASE"))
    }

    async fn alter_database(&self, _conn: &dyn Connection, _stmt: &AlterDatabase) -> Result<()> {
        Err(not_implemented("ALTER DATABASE"))
    }

    async fn drop_database(&self, _conn: &dyn Connection, _stmt: &DropDatabase) -> Result<()> {
        Err(not_implemented("DROP DATABASE"))
    }

    async fn create_table(&self, _conn: &dyn Connection, _stmt: &CreateTable) -> Result<()> {
        Err(not_implemented("CREATE TABLE"))
    }

    async fn alter_table(&self, _conn: &dyn Connection, _stmt: &AlterTable) -> Result<()> {
        Err(not_implemented("ALTER TABLE"))
    }

    async fn drop_table(&self, _conn: &dyn Connection, _stmt: &DropTable) -> Result<()> {
        Err(not_implemented("DROP TABLE"))
    }

    /// Validate a `USE`. The caller updates the connection on success.
    async fn use_database(&self, _conn: &dyn Connection, _stmt: &Use) -> Result<()> {
        Err(not_implemented("USE"))
    }
}

/// Data statements.
#[async_trait]
pub trait DataOps: Send + Sync {
    async fn insert(&self, _conn: &dyn Connection, _stmt: &Insert) -> Result<()> {
        Err(not_implemented("INSERT"))
    }

    async fn select(&self, _conn: &dyn Connection, _stmt: &Select) -> Result<ResultSet> {
        Err(not_implemented("SELECT"))
    }

    /// Returns the number of rows changed across every target table.
    async fn update(&self, _conn: &dyn Connection, _stmt: &Update) -> Result<u64> {
        Err(not_implemented("UPDATE"))
    }

    /// Returns the number of rows removed across every target table.
    async fn delete(&self, _conn: &dyn Connection, _stmt: &Delete) -> Result<u64> {
        Err(not_implemented("DELETE"))
    }
}

/// Transaction control statements.
#[async_trait]
pub trait TransactionOps: Send + Sync {
    async fn begin(&self, _conn: &dyn Connection, _stmt: &Begin) -> Result<()> {
        Err(not_implemented("BEGIN"))
    }

    async fn commit(&self, _conn: &dyn Connection, _stmt: &Commit) -> Result<()> {
        Err(not_implemented("COMMIT"))
    }

    async fn rollback(&self, _conn: &dyn Connection, _stmt: &Rollback) -> Result<()> {
        Err(not_implemented("ROLLBACK"))
    }
}

/// Decides what a parse failure turns into.
pub trait ErrorReporter: Send + Sync {
    /// `Some(error)` fails the statement with `error`; `None` downgrades the
    /// failure to a warning.
    fn report(&self, _conn: &dyn Connection, _query: &str, err: ParseError) -> Option<ServerError> {
        Some(ServerError::Parse(err))
    }
}

/// Every capability left at its "not implemented" default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unimplemented;

impl SchemaOps for Unimplemented {}
impl DataOps for Unimplemented {}
impl TransactionOps for Unimplemented {}

/// Transaction control that accepts every statement and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransactions;

#[async_trait]
impl TransactionOps for NoopTransactions {
    async fn begin(&self, _conn: &dyn Connection, _stmt: &Begin) -> Result<()> {
        Ok(())
    }

    async fn commit(&self, _conn: &dyn Connection, _stmt: &Commit) -> Result<()> {
        Ok(())
    }

    async fn rollback(&self, _conn: &dyn Connection, _stmt: &Rollback) -> Result<()> {
        Ok(())
    }
}

/// Reports parse failures unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnOriginal;

impl ErrorReporter for ReturnOriginal {}

/// Downgrades every parse failure to a warning.
///
/// Useful for clients that probe with vendor-specific statements the parser
/// does not understand.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressParseErrors;

impl ErrorReporter for SuppressParseErrors {
    fn report(&self, conn: &dyn Connection, query: &str, err: ParseError) -> Option<ServerError> {
        warn!(conn_id = conn.id(), query = %query, error = %err, "Suppressing parse error");
        None
    }
}
