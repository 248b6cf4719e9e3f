//! mysql-wire-server - Server-side core for the MySQL wire protocol
//!
//! This library provides the pieces a MySQL-compatible server needs between
//! the packet codec and the storage engine:
//! - Authentication method registry and password scrambling ([`auth`])
//! - A registry of live connections keyed by numeric id and UUID ([`server`])
//! - A capability-based executor contract ([`executor`]) and an in-memory
//!   reference backend implementing it ([`backend`])
//!
//! SQL text parsing is left to a [`sql::StatementParser`] supplied by the
//! embedding application.

#[macro_use]
mod logging;

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
pub mod server;
pub mod sql;

pub use auth::{AuthManager, AuthMethod, AuthQuery, Authenticator, CredentialStore};
pub use backend::MemoryBackend;
pub use config::Config;
pub use error::{Result, ServerError};
pub use executor::{Executor, QueryResult};
pub use logging::{init_tracing, init_tracing_from_config};
pub use server::{Connection, ConnectionRegistry, MetricsSnapshot, Server, ServerMetrics, Session};
