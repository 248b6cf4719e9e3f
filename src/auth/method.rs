//! Authentication method registry.
//!
//! This module provides the [`AuthMethod`] enum, which maps the plugin
//! names negotiated on the wire to a method variant and, for the supported
//! subset, to the function that produces the expected auth response.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ServerError};

use super::scramble::{clear_password, scramble_native_password};

/// Encryption function bound to a method.
///
/// Takes the password bytes and the server scramble (if any) and returns
/// the bytes a client sends as its auth response.
pub type EncryptFn = fn(&[u8], Option<&[u8]>) -> Result<Vec<u8>>;

/// Authentication method negotiated during connection setup.
///
/// Every variant except [`AuthMethod::None`] has a wire identifier, and
/// `AuthMethod::resolve(m.identifier())` returns `m` again.
///
/// # Example
///
/// ```
/// use mysql_wire_server::auth::AuthMethod;
///
/// let method = AuthMethod::resolve("mysql_native_password").unwrap();
/// assert_eq!(method, AuthMethod::NativePassword);
/// assert_eq!(method.to_string(), "mysql_native_password");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// No method negotiated yet.
    None,
    /// `mysql_old_password` (pre-4.1 hashing)
    OldPassword,
    /// `mysql_native_password` (SHA1 challenge/response)
    NativePassword,
    /// `sha256_password`
    Sha256Password,
    /// `caching_sha2_password` (MySQL 8.0 default)
    CachingSha2Password,
    /// `mysql_clear_password`
    ClearPassword,
}

impl AuthMethod {
    /// Every method that has a wire identifier.
    pub const IDENTIFIED: [AuthMethod; 5] = [
        AuthMethod::OldPassword,
        AuthMethod::NativePassword,
        AuthMethod::CachingSha2Password,
        AuthMethod::ClearPassword,
        AuthMethod::Sha256Password,
    ];

    /// Resolve a wire identifier to a method.
    ///
    /// # Errors
    ///
    /// [`ServerError::UnknownAuthMethod`] for anything outside the five
    /// known identifiers (matching is exact, including case).
    pub fn resolve(identifier: &str) -> Result<Self> {
        match identifier {
            "mysql_old_password" => Ok(Self::OldPassword),
            "mysql_native_password" => Ok(Self::NativePassword),
            "caching_sha2_password" => Ok(Self::CachingSha2Password),
            "mysql_clear_password" => Ok(Self::ClearPassword),
            "sha256_password" => Ok(Self::Sha256Password),
            other => Err(ServerError::UnknownAuthMethod(other.to_string())),
        }
    }

    /// Wire identifier, `None` for [`AuthMethod::None`].
    pub fn identifier(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::OldPassword => Some("mysql_old_password"),
            Self::NativePassword => Some("mysql_native_password"),
            Self::Sha256Password => Some("sha256_password"),
            Self::CachingSha2Password => Some("caching_sha2_password"),
            Self::ClearPassword => Some("mysql_clear_password"),
        }
    }

    /// Encryption function for this method.
    ///
    /// Only `mysql_native_password` and `mysql_clear_password` are in the
    /// supported subset.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotSupported`] for every other method.
    pub fn encryption_function(&self) -> Result<EncryptFn> {
        match self {
            Self::NativePassword => Ok(scramble_native_password),
            Self::ClearPassword => Ok(clear_password),
            other => Err(ServerError::NotSupported(format!(
                "no encryption function for authentication method '{}'",
                other
            ))),
        }
    }

    /// Whether [`encryption_function`](Self::encryption_function) succeeds.
    pub fn is_supported(&self) -> bool {
        self.encryption_function().is_ok()
    }
}

impl Default for AuthMethod {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier().unwrap_or("none"))
    }
}

impl FromStr for AuthMethod {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_roundtrip() {
        for method in AuthMethod::IDENTIFIED {
            let id = method.identifier().unwrap();
            let resolved = AuthMethod::resolve(id).unwrap();
            assert_eq!(resolved, method);
            assert_eq!(resolved.to_string(), id);
        }
    }

    #[test]
    fn test_wire_identifiers_exact() {
        assert_eq!(
            AuthMethod::resolve("mysql_old_password").unwrap(),
            AuthMethod::OldPassword
        );
        assert_eq!(
            AuthMethod::resolve("caching_sha2_password").unwrap(),
            AuthMethod::CachingSha2Password
        );
        assert_eq!(
            AuthMethod::resolve("sha256_password").unwrap(),
            AuthMethod::Sha256Password
        );
        assert_eq!(
            AuthMethod::resolve("mysql_clear_password").unwrap(),
            AuthMethod::ClearPassword
        );
    }

    #[test]
    fn test_resolve_unknown() {
        for id in ["", "none", "MYSQL_NATIVE_PASSWORD", "client_ed25519"] {
            let err = AuthMethod::resolve(id).unwrap_err();
            assert!(matches!(err, ServerError::UnknownAuthMethod(ref s) if s == id));
        }
    }

    #[test]
    fn test_from_str() {
        let method: AuthMethod = "mysql_native_password".parse().unwrap();
        assert_eq!(method, AuthMethod::NativePassword);
        assert!("bogus".parse::<AuthMethod>().is_err());
    }

    #[test]
    fn test_none_has_no_identifier() {
        assert_eq!(AuthMethod::None.identifier(), None);
        assert_eq!(AuthMethod::default(), AuthMethod::None);
        assert_eq!(AuthMethod::None.to_string(), "none");
    }

    #[test]
    fn test_supported_subset() {
        assert!(AuthMethod::NativePassword.is_supported());
        assert!(AuthMethod::ClearPassword.is_supported());

        for method in [
            AuthMethod::None,
            AuthMethod::OldPassword,
            AuthMethod::Sha256Password,
            AuthMethod::CachingSha2Password,
        ] {
            let err = method.encryption_function().unwrap_err();
            assert!(matches!(err, ServerError::NotSupported(_)), "{:?}", method);
        }
    }

    #[test]
    fn test_bound_functions() {
        let clear = AuthMethod::ClearPassword.encryption_function().unwrap();
        assert_eq!(clear(b"pw", None).unwrap(), b"pw".to_vec());

        let native = AuthMethod::NativePassword.encryption_function().unwrap();
        assert!(native(b"pw", None).is_err());
        assert_eq!(native(b"pw", Some(&[7u8; 20])).unwrap().len(), 20);
    }
}
