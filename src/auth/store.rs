//! Credential lookup.
//!
//! The embedding application owns its credentials; the core only looks them
//! up by username through [`CredentialStore`].

use async_trait::async_trait;
use dashmap::DashMap;

use crate::config::AuthConfig;
use crate::error::Result;

use super::{AuthMethod, Credential};

/// Credential lookup collaborator.
///
/// `Ok(None)` means "no such user" and is not an error. `Err` is reserved for
/// the store itself failing (backend unreachable, corrupt record).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one store is shared by every
/// connection task.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the credential for `username`.
    async fn lookup(&self, username: &str) -> Result<Option<Credential>>;
}

/// In-memory credential store.
///
/// Backed by a [`DashMap`], so accounts can be added or removed while
/// connections authenticate.
///
/// # Example
///
/// ```
/// use mysql_wire_server::auth::{Credential, StaticCredentialStore};
///
/// let store = StaticCredentialStore::new();
/// store.insert(Credential::native("app", "secret"));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StaticCredentialStore {
    credentials: DashMap<String, Credential>,
}

impl StaticCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the `auth.users` section.
    ///
    /// # Errors
    ///
    /// [`ServerError::UnknownAuthMethod`](crate::error::ServerError::UnknownAuthMethod)
    /// when a user names an unknown plugin. Loaded configs are already
    /// validated, so this only fires for hand-built ones.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let store = Self::new();
        for user in &config.users {
            let method = AuthMethod::resolve(&user.method)?;
            store.insert(Credential::new(&user.username, &user.password, method));
        }
        debug!(users = store.len(), "Loaded static credential store");
        Ok(store)
    }

    /// Add or replace an account. Returns the previous credential, if any.
    pub fn insert(&self, credential: Credential) -> Option<Credential> {
        self.credentials
            .insert(credential.username().to_string(), credential)
    }

    /// Remove an account.
    pub fn remove(&self, username: &str) -> Option<Credential> {
        self.credentials.remove(username).map(|(_, v)| v)
    }

    /// Check if an account exists.
    pub fn contains(&self, username: &str) -> bool {
        self.credentials.contains_key(username)
    }

    /// Get the number of accounts.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<Credential>> {
        Ok(self.credentials.get(username).map(|c| c.value().clone()))
    }
}
