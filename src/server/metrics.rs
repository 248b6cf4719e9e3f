//! Server metrics for observability.
//!
//! Counters are plain atomics so they can be bumped on every statement
//! without contention.
//!
//! # Usage
//!
//! ```
//! use mysql_wire_server::server::ServerMetrics;
//!
//! let metrics = ServerMetrics::new();
//! metrics.connection_accepted();
//! metrics.auth_success();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.connections_active, 1);
//! ```
//!
//! # Metric Categories
//!
//! ## Connection Metrics
//! - `connections_accepted`: Total sessions opened
//! - `connections_active`: Sessions currently open
//! - `connections_closed`: Sessions closed (disconnect or shutdown)
//!
//! ## Authentication Metrics
//! - `auth_successes` / `auth_failures`
//!
//! ## Statement Metrics
//! - `statements_executed`: Statements that reached the executor and succeeded
//! - `statement_errors`: Statements that failed (including parse failures)
//! - `parse_errors`: Parse failures reported to the error reporter
//! - `parse_errors_suppressed`: Parse failures downgraded to warnings

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters are independent; no ordering between them is needed.
const METRIC_ORDERING: Ordering = Ordering::Relaxed;

/// Centralized metrics collection for the server.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    // ========================================================================
    // Connection Metrics
    // ========================================================================
    /// Total sessions opened since startup
    pub connections_accepted: AtomicU64,
    /// Currently open sessions
    pub connections_active: AtomicU64,
    /// Sessions closed since startup
    pub connections_closed: AtomicU64,

    // ========================================================================
    // Authentication Metrics
    // ========================================================================
    /// Successful authentications
    pub auth_successes: AtomicU64,
    /// Failed authentications
    pub auth_failures: AtomicU64,

    // ========================================================================
    // Statement Metrics
    // ========================================================================
    /// Statements executed successfully
    pub statements_executed: AtomicU64,
    /// Statements that returned an error
    pub statement_errors: AtomicU64,
    /// Parse failures seen by the error reporter
    pub parse_errors: AtomicU64,
    /// Parse failures the reporter downgraded to warnings
    pub parse_errors_suppressed: AtomicU64,
}

impl ServerMetrics {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroed counters behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Record a new session.
    pub fn connection_accepted(&self) {
        self.connections_accepted.fetch_add(1, METRIC_ORDERING);
        self.connections_active.fetch_add(1, METRIC_ORDERING);
    }

    /// Record a closed session.
    pub fn connection_closed(&self) {
        // Saturate so a double close can't wrap the gauge
        let _ = self
            .connections_active
            .fetch_update(METRIC_ORDERING, METRIC_ORDERING, |v| {
                Some(v.saturating_sub(1))
            });
        self.connections_closed.fetch_add(1, METRIC_ORDERING);
    }

    /// Client was admitted.
    pub fn auth_success(&self) {
        self.auth_successes.fetch_add(1, METRIC_ORDERING);
    }

    /// Client was denied.
    pub fn auth_failure(&self) {
        self.auth_failures.fetch_add(1, METRIC_ORDERING);
    }

    /// Record a successfully executed statement.
    pub fn statement_executed(&self) {
        self.statements_executed.fetch_add(1, METRIC_ORDERING);
    }

    /// Record a failed statement.
    pub fn statement_error(&self) {
        self.statement_errors.fetch_add(1, METRIC_ORDERING);
    }

    /// Record a parse failure and whether it was suppressed.
    pub fn parse_error(&self, suppressed: bool) {
        self.parse_errors.fetch_add(1, METRIC_ORDERING);
        if suppressed {
            self.parse_errors_suppressed.fetch_add(1, METRIC_ORDERING);
        }
    }

    /// Copy every counter. Values are read one at a time, not atomically as a set.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_accepted: self.connections_accepted.load(METRIC_ORDERING),
            connections_active: self.connections_active.load(METRIC_ORDERING),
            connections_closed: self.connections_closed.load(METRIC_ORDERING),
            auth_successes: self.auth_successes.load(METRIC_ORDERING),
            auth_failures: self.auth_failures.load(METRIC_ORDERING),
            statements_executed: self.statements_executed.load(METRIC_ORDERING),
            statement_errors: self.statement_errors.load(METRIC_ORDERING),
            parse_errors: self.parse_errors.load(METRIC_ORDERING),
            parse_errors_suppressed: self.parse_errors_suppressed.load(METRIC_ORDERING),
        }
    }
}

/// Point-in-time copy of [`ServerMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections_accepted: u64,
    pub connections_active: u64,
    pub connections_closed: u64,
    pub auth_successes: u64,
    pub auth_failures: u64,
    pub statements_executed: u64,
    pub statement_errors: u64,
    pub parse_errors: u64,
    pub parse_errors_suppressed: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Connections:")?;
        writeln!(f, "  Accepted:  {}", self.connections_accepted)?;
        writeln!(f, "  Active:    {}", self.connections_active)?;
        writeln!(f, "  Closed:    {}", self.connections_closed)?;
        writeln!(f, "Authentication:")?;
        writeln!(f, "  Success:   {}", self.auth_successes)?;
        writeln!(f, "  Failure:   {}", self.auth_failures)?;
        writeln!(f, "Statements:")?;
        writeln!(f, "  Executed:  {}", self.statements_executed)?;
        writeln!(f, "  Errors:    {}", self.statement_errors)?;
        write!(
            f,
            "  Parse:     {} ({} suppressed)",
            self.parse_errors, self.parse_errors_suppressed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_metrics() {
        let metrics = ServerMetrics::new();

        metrics.connection_accepted();
        metrics.connection_accepted();
        assert_eq!(metrics.connections_active.load(Ordering::Relaxed), 2);

        metrics.connection_closed();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_accepted, 2);
        assert_eq!(snapshot.connections_active, 1);
        assert_eq!(snapshot.connections_closed, 1);
    }

    #[test]
    fn test_active_gauge_never_wraps() {
        let metrics = ServerMetrics::new();
        metrics.connection_closed();
        assert_eq!(metrics.snapshot().connections_active, 0);
    }

    #[test]
    fn test_statement_metrics() {
        let metrics = ServerMetrics::new();
        metrics.statement_executed();
        metrics.statement_error();
        metrics.parse_error(true);
        metrics.parse_error(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.statements_executed, 1);
        assert_eq!(snapshot.statement_errors, 1);
        assert_eq!(snapshot.parse_errors, 2);
        assert_eq!(snapshot.parse_errors_suppressed, 1);
    }

    #[test]
    fn test_snapshot_display() {
        let metrics = ServerMetrics::new();
        metrics.connection_accepted();
        metrics.auth_failure();

        let display = format!("{}", metrics.snapshot());
        assert!(display.contains("Accepted:  1"));
        assert!(display.contains("Failure:   1"));
    }

    #[test]
    fn test_shared_metrics() {
        let metrics = ServerMetrics::shared();
        let metrics2 = Arc::clone(&metrics);
        metrics.auth_success();
        metrics2.auth_success();
        assert_eq!(metrics.snapshot().auth_successes, 2);
    }
}
