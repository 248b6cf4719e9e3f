//! Configuration types

use serde::Deserialize;
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use crate::auth::AuthMethod;

/// Root configuration structure
///
/// Every section is optional; an empty document yields a permissive server
/// listening on `127.0.0.1:3306` with an empty in-memory catalog.
///
/// # Example
///
/// ```yaml
/// server:
///   listen_port: 3307
///
/// auth:
///   mode: verify
///   allow_unauthenticated: false
///   users:
///     - username: "app"
///       password: "${APP_PASSWORD}"
///
/// backend:
///   databases: ["ycsb"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reference backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.server.listen_addr()?;
        if self.logging.level.trim().is_empty() {
            return Err("logging.level must be non-empty".to_string());
        }

        let mut seen = HashSet::new();
        for user in &self.auth.users {
            if user.username.is_empty() {
                return Err("auth.users entries must have a non-empty username".to_string());
            }
            if !seen.insert(user.username.as_str()) {
                return Err(format!("Duplicate user '{}' in auth.users", user.username));
            }
            AuthMethod::resolve(&user.method).map_err(|e| e.to_string())?;
        }

        let mut databases = HashSet::new();
        for db in &self.backend.databases {
            if db.is_empty() {
                return Err("backend.databases entries must be non-empty".to_string());
            }
            if !databases.insert(db.as_str()) {
                return Err(format!("Duplicate database '{}' in backend.databases", db));
            }
        }

        Ok(())
    }
}

/// Server listener configuration
///
/// The listener itself belongs to the embedding application, which binds
/// [`ServerConfig::listen_addr`] (also exposed as [`crate::Server::listen_addr`]).
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Port to listen on
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Maximum number of concurrent connections (0 = unlimited)
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Version string advertised in the initial handshake
    #[serde(default = "default_server_version")]
    pub server_version: String,
}

impl ServerConfig {
    /// Socket address built from `listen_address` and `listen_port`.
    ///
    /// `listen_address` must be an IP literal; IPv6 is written without
    /// brackets.
    pub fn listen_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .listen_address
            .parse()
            .map_err(|_| format!("Invalid server.listen_address '{}'", self.listen_address))?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            max_connections: default_max_connections(),
            server_version: default_server_version(),
        }
    }
}

/// How configured users are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Accept any client whose username is known
    #[default]
    Lookup,
    /// Check the client's scrambled response against the stored password
    Verify,
}

/// Authentication configuration
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Lookup or verify
    #[serde(default)]
    pub mode: AuthMode,
    /// Accept every client when no users are configured
    #[serde(default = "default_allow_unauthenticated")]
    pub allow_unauthenticated: bool,
    /// Accounts known to the server
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            allow_unauthenticated: default_allow_unauthenticated(),
            users: Vec::new(),
        }
    }
}

/// One configured account
#[derive(Clone, Deserialize)]
pub struct UserConfig {
    /// Account name
    pub username: String,
    /// Plaintext password (supports `${VAR}` / `$VAR`)
    #[serde(default)]
    pub password: String,
    /// Wire identifier of the authentication plugin
    #[serde(default = "default_auth_method")]
    pub method: String,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("method", &self.method)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Reference backend configuration
#[derive(Debug, Default, Deserialize)]
pub struct BackendConfig {
    /// Databases created at startup
    #[serde(default)]
    pub databases: Vec<String>,
    /// Downgrade parse errors to warnings instead of failing the statement
    #[serde(default)]
    pub suppress_parse_errors: bool,
}

fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    3306
}

fn default_max_connections() -> usize {
    1000
}

fn default_server_version() -> String {
    "8.0.0-mysql-wire-server".to_string()
}

fn default_allow_unauthenticated() -> bool {
    true
}

fn default_auth_method() -> String {
    "mysql_native_password".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
