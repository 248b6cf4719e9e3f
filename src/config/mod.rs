//! Configuration module for mysql-wire-server
//!
//! ```yaml
//! server:
//!   listen_address: "0.0.0.0"
//!   listen_port: 3306
//!
//! auth:
//!   mode: lookup
//!   users:
//!     - username: "root"
//!       password: "${ROOT_PASSWORD}"
//!       method: "mysql_native_password"
//!
//! logging:
//!   level: debug
//!
//! backend:
//!   databases: ["ycsb"]
//!   suppress_parse_errors: true
//! ```

mod loader;
mod types;

pub use loader::{apply_env_overrides, load_config, load_config_from_str};
pub use types::*;
