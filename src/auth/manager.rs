//! Authentication managers.
//!
//! Two entry points decide accept/deny for one [`AuthQuery`]:
//!
//! - [`AuthManager`] accepts when any registered [`CredentialStore`] knows
//!   the username. With no stores registered it falls back to the
//!   `allow_when_empty` switch.
//! - [`VerifyingAuthManager`] delegates to a single [`CredentialVerifier`].
//!   Verifier errors are logged and reported as a denial; callers never see
//!   the cause through this entry point.

use std::sync::Arc;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::error::Result;
use crate::server::Connection;

use super::{AuthQuery, CredentialStore};

/// Decides whether a connection may proceed.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `true` to accept the connection, `false` to deny it.
    async fn authenticate(&self, conn: &dyn Connection, query: &AuthQuery) -> bool;
}

/// Store-lookup authentication.
///
/// Stores are consulted in registration order; the first one that knows
/// the username wins. A store error is logged and the next store tried.
///
/// # Security
///
/// A manager with no stores accepts every client unless built with
/// [`AuthManager::strict`] or `allow_when_empty(false)`. That default keeps
/// test and demo deployments working out of the box; production setups
/// should turn it off.
pub struct AuthManager {
    stores: Vec<Arc<dyn CredentialStore>>,
    allow_when_empty: bool,
}

impl AuthManager {
    /// Manager with no stores that accepts everyone until one is registered.
    pub fn new() -> Self {
        Self {
            stores: Vec::new(),
            allow_when_empty: true,
        }
    }

    /// Manager with no stores that denies everyone until one is registered.
    pub fn strict() -> Self {
        Self {
            stores: Vec::new(),
            allow_when_empty: false,
        }
    }

    /// Set the behaviour when no stores are registered.
    pub fn allow_when_empty(mut self, allow: bool) -> Self {
        self.allow_when_empty = allow;
        self
    }

    /// Append a store (builder form).
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.register(store);
        self
    }

    /// Append a store.
    pub fn register(&mut self, store: Arc<dyn CredentialStore>) {
        self.stores.push(store);
    }

    /// Number of registered stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Whether no stores are registered.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Whether an empty manager accepts clients.
    pub fn allows_when_empty(&self) -> bool {
        self.allow_when_empty
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for AuthManager {
    async fn authenticate(&self, conn: &dyn Connection, query: &AuthQuery) -> bool {
        if self.stores.is_empty() {
            if self.allow_when_empty {
                warn!(
                    conn_id = conn.id(),
                    user = %query.username(),
                    "No credential stores registered, accepting unauthenticated client"
                );
            } else {
                debug!(conn_id = conn.id(), "No credential stores registered, denying");
            }
            return self.allow_when_empty;
        }

        for (index, store) in self.stores.iter().enumerate() {
            match store.lookup(query.username()).await {
                Ok(Some(_)) => {
                    debug!(conn_id = conn.id(), user = %query.username(), store = index, "Credential found");
                    return true;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(conn_id = conn.id(), store = index, error = %e, "Credential lookup failed");
                }
            }
        }

        debug!(conn_id = conn.id(), user = %query.username(), "No store knows user");
        false
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("stores", &self.stores.len())
            .field("allow_when_empty", &self.allow_when_empty)
            .finish()
    }
}

/// Checks a client's proof of identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(true)` when the query proves the claimed identity.
    async fn verify(&self, conn: &dyn Connection, query: &AuthQuery) -> Result<bool>;
}

/// Authentication through a single [`CredentialVerifier`].
pub struct VerifyingAuthManager {
    verifier: Arc<dyn CredentialVerifier>,
}

impl VerifyingAuthManager {
    /// Wrap a verifier.
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl Authenticator for VerifyingAuthManager {
    async fn authenticate(&self, conn: &dyn Connection, query: &AuthQuery) -> bool {
        match self.verifier.verify(conn, query).await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(conn_id = conn.id(), user = %query.username(), error = %e, "Credential verification failed");
                false
            }
        }
    }
}

/// [`CredentialVerifier`] that recomputes the expected response from a
/// stored plaintext password.
///
/// - unknown user: denied
/// - empty stored password: accepted iff the client sent an empty response
/// - otherwise the client's response must equal the stored password run
///   through the method's encryption function with the query's scramble
///   (compared in constant time)
///
/// A client that declared a different plugin than the account uses is
/// denied; auth-switch negotiation belongs to the transport.
pub struct StoreVerifier {
    store: Arc<dyn CredentialStore>,
}

impl StoreVerifier {
    /// Verify against `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialVerifier for StoreVerifier {
    async fn verify(&self, conn: &dyn Connection, query: &AuthQuery) -> Result<bool> {
        let Some(credential) = self.store.lookup(query.username()).await? else {
            debug!(conn_id = conn.id(), user = %query.username(), "Unknown user");
            return Ok(false);
        };

        if credential.has_empty_secret() || query.response().is_empty() {
            return Ok(credential.has_empty_secret() && query.response().is_empty());
        }

        let expected = match query.method() {
            Some(method) if method != credential.method() => {
                debug!(
                    conn_id = conn.id(),
                    declared = %method,
                    expected = %credential.method(),
                    "Client declared a different auth plugin"
                );
                return Ok(false);
            }
            Some(_) => query.encrypt(credential.secret())?,
            None => {
                let encrypt = credential.method().encryption_function()?;
                encrypt(credential.secret(), query.scramble())?
            }
        };

        Ok(expected.ct_eq(query.response()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        scramble_native_password, with_plugin_name, with_response, with_scramble, with_username,
        AuthMethod, Credential, StaticCredentialStore,
    };
    use crate::error::ServerError;
    use crate::server::Session;

    struct FailingStore;

    #[async_trait]
    impl CredentialStore for FailingStore {
        async fn lookup(&self, _username: &str) -> Result<Option<crate::auth::Credential>> {
            Err(ServerError::Connection("store unreachable".into()))
        }
    }

    struct ErrVerifier;

    #[async_trait]
    impl CredentialVerifier for ErrVerifier {
        async fn verify(&self, _conn: &dyn Connection, _query: &AuthQuery) -> Result<bool> {
            Err(ServerError::Connection("verifier down".into()))
        }
    }

    struct FixedVerifier(bool);

    #[async_trait]
    impl CredentialVerifier for FixedVerifier {
        async fn verify(&self, _conn: &dyn Connection, _query: &AuthQuery) -> Result<bool> {
            Ok(self.0)
        }
    }

    fn store_with(creds: Vec<Credential>) -> Arc<StaticCredentialStore> {
        let store = StaticCredentialStore::new();
        for c in creds {
            store.insert(c);
        }
        Arc::new(store)
    }

    fn query_for(user: &str) -> AuthQuery {
        AuthQuery::new([with_username(user)]).unwrap()
    }

    #[tokio::test]
    async fn test_empty_manager_permissive_by_default() {
        let conn = Session::new(1);
        let manager = AuthManager::new();
        assert!(manager.is_empty());
        assert!(manager.authenticate(&conn, &query_for("anyone")).await);
    }

    #[tokio::test]
    async fn test_empty_manager_strict() {
        let conn = Session::new(1);
        assert!(!AuthManager::strict().authenticate(&conn, &query_for("anyone")).await);
        assert!(
            !AuthManager::new()
                .allow_when_empty(false)
                .authenticate(&conn, &query_for("anyone"))
                .await
        );
    }

    #[tokio::test]
    async fn test_lookup_in_registration_order() {
        let conn = Session::new(1);
        let manager = AuthManager::strict()
            .with_store(Arc::new(FailingStore))
            .with_store(store_with(vec![Credential::native("app", "pw")]));
        assert_eq!(manager.len(), 2);

        // First store errors, second knows the user
        assert!(manager.authenticate(&conn, &query_for("app")).await);
        assert!(!manager.authenticate(&conn, &query_for("ghost")).await);
    }

    #[tokio::test]
    async fn test_registered_stores_override_permissive_flag() {
        let conn = Session::new(1);
        let manager = AuthManager::new().with_store(store_with(vec![]));
        assert!(manager.allows_when_empty());
        assert!(!manager.authenticate(&conn, &query_for("anyone")).await);
    }

    #[tokio::test]
    async fn test_verifying_manager_conflates_errors() {
        let conn = Session::new(1);
        let query = query_for("app");

        assert!(VerifyingAuthManager::new(Arc::new(FixedVerifier(true)))
            .authenticate(&conn, &query)
            .await);
        assert!(!VerifyingAuthManager::new(Arc::new(FixedVerifier(false)))
            .authenticate(&conn, &query)
            .await);
        assert!(!VerifyingAuthManager::new(Arc::new(ErrVerifier))
            .authenticate(&conn, &query)
            .await);
    }

    #[tokio::test]
    async fn test_store_verifier_native_password() {
        let conn = Session::new(1);
        let verifier = StoreVerifier::new(store_with(vec![Credential::native("app", "s3cret")]));
        let scramble = crate::auth::generate_scramble();

        let good = AuthQuery::new([
            with_username("app"),
            with_scramble(scramble.to_vec()),
            with_response(scramble_native_password(b"s3cret", Some(&scramble[..])).unwrap()),
            with_plugin_name("mysql_native_password"),
        ])
        .unwrap();
        assert!(verifier.verify(&conn, &good).await.unwrap());

        let bad = AuthQuery::new([
            with_username("app"),
            with_scramble(scramble.to_vec()),
            with_response(scramble_native_password(b"wrong", Some(&scramble[..])).unwrap()),
        ])
        .unwrap();
        assert!(!verifier.verify(&conn, &bad).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_verifier_empty_password() {
        let conn = Session::new(1);
        let verifier = StoreVerifier::new(store_with(vec![
            Credential::native("nopw", ""),
            Credential::native("app", "pw"),
        ]));

        assert!(verifier.verify(&conn, &query_for("nopw")).await.unwrap());

        let sent_something = AuthQuery::new([with_username("nopw"), with_response(vec![1u8; 20])])
            .unwrap();
        assert!(!verifier.verify(&conn, &sent_something).await.unwrap());

        // Account has a password, client sent nothing
        assert!(!verifier.verify(&conn, &query_for("app")).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_verifier_clear_password() {
        let conn = Session::new(1);
        let verifier = StoreVerifier::new(store_with(vec![Credential::new(
            "legacy",
            "plain",
            AuthMethod::ClearPassword,
        )]));

        let query = AuthQuery::new([
            with_username("legacy"),
            with_response(b"plain".to_vec()),
            with_plugin_name("mysql_clear_password"),
        ])
        .unwrap();
        assert!(verifier.verify(&conn, &query).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_verifier_plugin_mismatch_denied() {
        let conn = Session::new(1);
        let verifier = StoreVerifier::new(store_with(vec![Credential::new(
            "legacy",
            "plain",
            AuthMethod::ClearPassword,
        )]));

        let query = AuthQuery::new([
            with_username("legacy"),
            with_scramble(vec![1u8; 20]),
            with_response(b"plain".to_vec()),
            with_plugin_name("mysql_native_password"),
        ])
        .unwrap();
        assert!(!verifier.verify(&conn, &query).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_verifier_missing_scramble_is_error() {
        let conn = Session::new(1);
        let store = store_with(vec![Credential::native("app", "pw")]);
        let query = AuthQuery::new([with_username("app"), with_response(vec![1u8; 20])]).unwrap();

        let verifier = StoreVerifier::new(store.clone());
        assert!(matches!(
            verifier.verify(&conn, &query).await.unwrap_err(),
            ServerError::InvalidArgument(_)
        ));

        // Through the verifying manager the error is just a denial
        let manager = VerifyingAuthManager::new(Arc::new(StoreVerifier::new(store)));
        assert!(!manager.authenticate(&conn, &query).await);
    }

    #[tokio::test]
    async fn test_store_verifier_unsupported_account_method() {
        let conn = Session::new(1);
        let verifier = StoreVerifier::new(store_with(vec![Credential::new(
            "modern",
            "pw",
            AuthMethod::CachingSha2Password,
        )]));
        let query =
            AuthQuery::new([with_username("modern"), with_response(vec![1u8; 32])]).unwrap();
        assert!(matches!(
            verifier.verify(&conn, &query).await.unwrap_err(),
            ServerError::NotSupported(_)
        ));
    }
}
