//! Server module for mysql-wire-server
//!
//! This module contains:
//! - Connection handle and stock session
//! - Dual-keyed connection registry
//! - Server façade driving the connection lifecycle
//! - Metrics collection

pub mod connection;
pub mod handler;
pub mod metrics;
pub mod registry;

pub use connection::{Connection, ConnectionIdAllocator, Session};
pub use handler::Server;
pub use metrics::{MetricsSnapshot, ServerMetrics};
pub use registry::ConnectionRegistry;
