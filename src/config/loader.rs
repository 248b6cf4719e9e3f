//! Configuration loader

use super::Config;
use crate::error::{Result, ServerError};
use std::path::Path;

const ENV_PREFIX: &str = "MYSQL_WIRE_SERVER_";

/// Load configuration from a YAML file
///
/// Also applies MYSQL_WIRE_SERVER_* env var overrides after loading.
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load configuration from a YAML string (useful for testing)
///
/// Also applies MYSQL_WIRE_SERVER_* env var overrides after loading.
pub fn load_config_from_str(yaml: &str) -> Result<Config> {
    let mut config: Config = if yaml.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    resolve_config_env_vars(&mut config);
    apply_env_overrides(&mut config);
    config.validate().map_err(ServerError::Config)?;
    Ok(config)
}

/// Apply MYSQL_WIRE_SERVER_* environment variable overrides to a config.
///
/// Supported env vars:
/// - `MYSQL_WIRE_SERVER_LISTEN_ADDRESS` - Override listen address
/// - `MYSQL_WIRE_SERVER_LISTEN_PORT` - Override listen port
/// - `MYSQL_WIRE_SERVER_MAX_CONNECTIONS` - Override max connections
/// - `MYSQL_WIRE_SERVER_LOG_LEVEL` - Override log level
/// - `MYSQL_WIRE_SERVER_ALLOW_UNAUTHENTICATED` - Override the permissive auth switch
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

    if let Some(val) = var("LISTEN_ADDRESS") {
        debug!("Overriding listen_address from {}LISTEN_ADDRESS", ENV_PREFIX);
        config.server.listen_address = val;
    }
    if let Some(port) = var("LISTEN_PORT").and_then(|v| v.parse::<u16>().ok()) {
        debug!("Overriding listen_port from {}LISTEN_PORT", ENV_PREFIX);
        config.server.listen_port = port;
    }
    if let Some(max) = var("MAX_CONNECTIONS").and_then(|v| v.parse::<usize>().ok()) {
        debug!("Overriding max_connections from {}MAX_CONNECTIONS", ENV_PREFIX);
        config.server.max_connections = max;
    }
    if let Some(val) = var("LOG_LEVEL") {
        debug!("Overriding log level from {}LOG_LEVEL", ENV_PREFIX);
        config.logging.level = val;
    }
    if let Some(allow) = var("ALLOW_UNAUTHENTICATED").and_then(|v| parse_bool(&v)) {
        debug!(
            "Overriding allow_unauthenticated from {}ALLOW_UNAUTHENTICATED",
            ENV_PREFIX
        );
        config.auth.allow_unauthenticated = allow;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve environment variables in a string value
///
/// Supports two syntaxes:
/// - `${VAR_NAME}` - curly brace syntax
/// - `$VAR_NAME` - simple syntax (for single variable values)
///
/// If the environment variable is not set, the original value is preserved.
fn resolve_env_var(value: &str) -> String {
    let var_name = if let Some(inner) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}'))
    {
        inner
    } else if let Some(inner) = value.strip_prefix('$') {
        if inner.is_empty() || inner.contains(' ') {
            return value.to_string();
        }
        inner
    } else {
        return value.to_string();
    };

    match std::env::var(var_name) {
        Ok(env_value) => {
            debug!("Resolved env var {} from config", var_name);
            env_value
        }
        Err(_) => {
            debug!("Env var {} not set, keeping original value", var_name);
            value.to_string()
        }
    }
}

/// Resolve environment variables in all config fields that support it
fn resolve_config_env_vars(config: &mut Config) {
    for user in &mut config.auth.users {
        user.username = resolve_env_var(&user.username);
        user.password = resolve_env_var(&user.password);
    }
}
