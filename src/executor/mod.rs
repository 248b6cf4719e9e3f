//! Executor contract.
//!
//! A backend is described by four capabilities:
//!
//! - [`SchemaOps`] - CREATE/ALTER/DROP for databases and tables, USE
//! - [`DataOps`] - INSERT, SELECT, UPDATE, DELETE
//! - [`TransactionOps`] - BEGIN, COMMIT, ROLLBACK
//! - [`ErrorReporter`] - what a parse failure becomes
//!
//! An [`Executor`] composes one object per capability. Capabilities a
//! backend does not provide fall back to stock parts:
//! [`Unimplemented`] fails with
//! [`ServerError::NotImplemented`](crate::error::ServerError::NotImplemented),
//! which ends the statement but not the connection.

mod dispatch;
mod ops;
mod result;

pub use dispatch::{Executor, ExecutorBuilder};
pub use ops::{
    DataOps, ErrorReporter, NoopTransactions, ReturnOriginal, SchemaOps, SuppressParseErrors,
    TransactionOps, Unimplemented,
};
pub use result::{QueryResult, ResultSet};
