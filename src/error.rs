//! Error types for mysql-wire-server

use thiserror::Error;

use crate::sql::ParseError;

/// Main error type for the server core
#[derive(Error, Debug)]
pub enum ServerError {
    /// I/O error (network, file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error (transport gone, close failed)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Capability intentionally left unimplemented by a backend
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Method or algorithm combination outside the supported subset
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Authentication failure
    #[error("Access denied for user '{0}'")]
    AccessDenied(String),

    /// Malformed input to an encryption function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unrecognized authentication method identifier
    #[error("Unknown authentication method: '{0}'")]
    UnknownAuthMethod(String),

    /// CREATE DATABASE on an existing name
    #[error("Can't create database '{0}'; database exists")]
    DatabaseExists(String),

    /// Database lookup failed
    #[error("Unknown database '{0}'")]
    DatabaseNotFound(String),

    /// Statement needs a database but none is selected on the connection
    #[error("No database selected")]
    NoDatabaseSelected,

    /// CREATE TABLE on an existing name
    #[error("Table '{0}' already exists")]
    CollectionExists(String),

    /// Table lookup failed
    #[error("Table '{0}' doesn't exist")]
    CollectionNotFound(String),

    /// Column lookup failed
    #[error("Unknown column '{0}'")]
    ColumnNotFound(String),

    /// Column added twice
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// INSERT row whose value count differs from the column list
    #[error("Column count doesn't match value count at row {0}")]
    ValueCountMismatch(usize),

    /// Removal of something that was expected to be present
    #[error("Failed to delete {0}")]
    Deletion(String),

    /// Statement text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Aggregate of every failure seen during bulk connection teardown
    #[error("{} connection(s) failed to close: {}", .0.len(), join_messages(.0))]
    Shutdown(Vec<ServerError>),
}

/// Result type alias for ServerError
pub type Result<T> = std::result::Result<T, ServerError>;

fn join_messages(errors: &[ServerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServerError {
    /// MySQL error number written into the ERR packet.
    pub fn code(&self) -> u16 {
        match self {
            Self::AccessDenied(_) => 1045,
            Self::DatabaseExists(_) => 1007,
            Self::DatabaseNotFound(_) => 1049,
            Self::NoDatabaseSelected => 1046,
            Self::CollectionExists(_) => 1050,
            Self::CollectionNotFound(_) => 1146,
            Self::ColumnNotFound(_) => 1054,
            Self::DuplicateColumn(_) => 1060,
            Self::ValueCountMismatch(_) => 1136,
            Self::Parse(_) => 1064,
            Self::NotImplemented(_) | Self::NotSupported(_) => 1235,
            Self::UnknownAuthMethod(_) => 1524,
            _ => 1105,
        }
    }

    /// Five character SQLSTATE matching [`code`](Self::code).
    pub fn sql_state(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "28000",
            Self::DatabaseNotFound(_)
            | Self::Parse(_)
            | Self::NotImplemented(_)
            | Self::NotSupported(_) => "42000",
            Self::NoDatabaseSelected => "3D000",
            Self::CollectionExists(_) => "42S01",
            Self::CollectionNotFound(_) => "42S02",
            Self::ColumnNotFound(_) => "42S22",
            Self::DuplicateColumn(_) => "42S21",
            Self::ValueCountMismatch(_) => "21S01",
            _ => "HY000",
        }
    }

    /// Whether the error must terminate the connection.
    ///
    /// Statement-level failures (schema, data, parse, unimplemented
    /// capabilities) only abort the statement that raised them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied(_) | Self::Io(_) | Self::Connection(_) | Self::Shutdown(_)
        )
    }
}

impl From<serde_yaml::Error> for ServerError {
    fn from(err: serde_yaml::Error) -> Self {
        ServerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ServerError::AccessDenied("root".into()).code(), 1045);
        assert_eq!(ServerError::DatabaseExists("ycsb".into()).code(), 1007);
        assert_eq!(ServerError::CollectionNotFound("t".into()).code(), 1146);
        assert_eq!(ServerError::Deletion("table t".into()).code(), 1105);
        assert_eq!(ServerError::NotImplemented("BEGIN".into()).sql_state(), "42000");
    }

    #[test]
    fn test_shutdown_message_lists_every_failure() {
        let err = ServerError::Shutdown(vec![
            ServerError::Connection("conn 2 reset".into()),
            ServerError::Connection("conn 5 reset".into()),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 connection(s) failed to close"));
        assert!(msg.contains("conn 2 reset"));
        assert!(msg.contains("conn 5 reset"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ServerError::AccessDenied("u".into()).is_fatal());
        assert!(!ServerError::DatabaseNotFound("d".into()).is_fatal());
        assert!(!ServerError::NotImplemented("x".into()).is_fatal());
        assert!(!ServerError::Parse(ParseError::new("bad")).is_fatal());
    }
}
