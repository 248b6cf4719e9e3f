//! Stored credentials.
//!
//! A [`Credential`] is what a [`CredentialStore`](crate::auth::CredentialStore)
//! hands back for a username. The secret is zeroized on drop and never
//! appears in `Debug` output.

use zeroize::{ZeroizeOnDrop, Zeroizing};

use super::AuthMethod;

/// Username, secret and the method the client is expected to use.
///
/// # Example
///
/// ```
/// use mysql_wire_server::auth::{AuthMethod, Credential};
///
/// let cred = Credential::new("app", "s3cret", AuthMethod::NativePassword);
/// assert_eq!(cred.username(), "app");
/// assert!(!format!("{:?}", cred).contains("s3cret"));
/// ```
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    #[zeroize(skip)]
    username: String,
    secret: Zeroizing<String>,
    #[zeroize(skip)]
    method: AuthMethod,
}

impl Credential {
    /// Create a credential from a plaintext secret.
    pub fn new(username: impl Into<String>, secret: impl Into<String>, method: AuthMethod) -> Self {
        Self {
            username: username.into(),
            secret: Zeroizing::new(secret.into()),
            method,
        }
    }

    /// Native-password credential, the most common case.
    pub fn native(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(username, secret, AuthMethod::NativePassword)
    }

    /// Account name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plaintext secret.
    ///
    /// # Security
    ///
    /// Use the returned slice immediately; do not copy it into long-lived
    /// storage.
    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Whether the account has an empty password.
    pub fn has_empty_secret(&self) -> bool {
        self.secret.is_empty()
    }

    /// Method the account authenticates with.
    pub fn method(&self) -> AuthMethod {
        self.method
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("method", &self.method)
            .finish()
    }
}
