//! Per-attempt authentication query.
//!
//! An [`AuthQuery`] is assembled from an ordered list of [`QueryOption`]s.
//! Each option may fail; the first failure aborts construction, so a caller
//! never observes a half-configured query.
//!
//! ```
//! use mysql_wire_server::auth::{with_plugin_name, with_response, with_username, AuthQuery};
//!
//! let query = AuthQuery::new([
//!     with_username("app"),
//!     with_response(vec![1, 2, 3]),
//!     with_plugin_name("mysql_native_password"),
//! ])
//! .unwrap();
//! assert_eq!(query.username(), "app");
//!
//! // Unsupported plugin: construction fails, nothing is returned
//! assert!(AuthQuery::new([with_plugin_name("sha256_password")]).is_err());
//! ```

use crate::error::{Result, ServerError};

use super::method::{AuthMethod, EncryptFn};

/// A fallible configuration step applied to a fresh [`AuthQuery`].
pub type QueryOption = Box<dyn FnOnce(&mut AuthQuery) -> Result<()> + Send>;

/// Transient negotiation record for one authentication attempt.
#[derive(Default)]
pub struct AuthQuery {
    username: String,
    response: Vec<u8>,
    plugin_name: Option<String>,
    method: Option<AuthMethod>,
    encrypt: Option<EncryptFn>,
    scramble: Option<Vec<u8>>,
}

impl AuthQuery {
    /// Apply `options` in order to an empty query.
    ///
    /// # Errors
    ///
    /// The error of the first option that fails.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = QueryOption>,
    {
        let mut query = Self::default();
        for option in options {
            option(&mut query)?;
        }
        Ok(query)
    }

    /// Claimed account name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Auth response bytes sent by the client.
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    /// Plugin name the client declared, if any.
    pub fn plugin_name(&self) -> Option<&str> {
        self.plugin_name.as_deref()
    }

    /// Method resolved from the plugin name.
    pub fn method(&self) -> Option<AuthMethod> {
        self.method
    }

    /// Scramble the server sent for this attempt.
    pub fn scramble(&self) -> Option<&[u8]> {
        self.scramble.as_deref()
    }

    /// Whether an encryption function was bound from the plugin name.
    pub fn has_encryption(&self) -> bool {
        self.encrypt.is_some()
    }

    /// Run the bound encryption function over `password` and the scramble.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotSupported`] when no plugin name was set, otherwise
    /// whatever the encryption function returns.
    pub fn encrypt(&self, password: &[u8]) -> Result<Vec<u8>> {
        let encrypt = self.encrypt.ok_or_else(|| {
            ServerError::NotSupported("no authentication plugin bound to query".into())
        })?;
        encrypt(password, self.scramble())
    }
}

impl std::fmt::Debug for AuthQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthQuery")
            .field("username", &self.username)
            .field("response", &"[REDACTED]")
            .field("plugin_name", &self.plugin_name)
            .field("method", &self.method)
            .field("has_scramble", &self.scramble.is_some())
            .finish()
    }
}

/// Set the claimed account name.
pub fn with_username(username: impl Into<String>) -> QueryOption {
    let username = username.into();
    Box::new(move |query: &mut AuthQuery| {
        query.username = username;
        Ok(())
    })
}

/// Set the client's auth response bytes.
pub fn with_response(response: impl Into<Vec<u8>>) -> QueryOption {
    let response = response.into();
    Box::new(move |query: &mut AuthQuery| {
        query.response = response;
        Ok(())
    })
}

/// Set the server scramble the response was computed against.
pub fn with_scramble(scramble: impl Into<Vec<u8>>) -> QueryOption {
    let scramble = scramble.into();
    Box::new(move |query: &mut AuthQuery| {
        query.scramble = Some(scramble);
        Ok(())
    })
}

/// Set the client-declared plugin name.
///
/// Resolves the identifier through [`AuthMethod::resolve`] and binds the
/// method's encryption function onto the query.
///
/// # Errors
///
/// Fails with [`ServerError::UnknownAuthMethod`] for an unknown identifier
/// and [`ServerError::NotSupported`] for a method without an encryption
/// function.
pub fn with_plugin_name(name: impl Into<String>) -> QueryOption {
    let name = name.into();
    Box::new(move |query: &mut AuthQuery| {
        let method = AuthMethod::resolve(&name)?;
        let encrypt = method.encryption_function()?;
        query.plugin_name = Some(name);
        query.method = Some(method);
        query.encrypt = Some(encrypt);
        Ok(())
    })
}
