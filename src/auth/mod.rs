//! Authentication negotiation core.
//!
//! # Overview
//!
//! - [`AuthMethod`] - registry of wire plugin identifiers and their
//!   encryption functions
//! - [`scramble_native_password`] / [`clear_password`] - the byte transforms
//!   the protocol mandates
//! - [`AuthQuery`] - per-attempt record built from [`QueryOption`]s
//! - [`Credential`] / [`CredentialStore`] - credential lookup collaborator
//! - [`AuthManager`] / [`VerifyingAuthManager`] - accept/deny decisions
//!
//! # Security
//!
//! Stored secrets use [`zeroize::Zeroizing`] and are erased on drop. Custom
//! [`Debug`] implementations redact secrets and client responses.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mysql_wire_server::auth::{
//!     with_username, AuthManager, AuthQuery, Authenticator, Credential,
//!     StaticCredentialStore,
//! };
//! use mysql_wire_server::server::Session;
//!
//! # tokio_test_block(async {
//! let store = StaticCredentialStore::new();
//! store.insert(Credential::native("app", "secret"));
//!
//! let manager = AuthManager::strict().with_store(Arc::new(store));
//! let query = AuthQuery::new([with_username("app")]).unwrap();
//! assert!(manager.authenticate(&Session::new(1), &query).await);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod credential;
mod manager;
mod method;
mod query;
mod scramble;
mod store;

pub use credential::Credential;
pub use manager::{
    AuthManager, Authenticator, CredentialVerifier, StoreVerifier, VerifyingAuthManager,
};
pub use method::{AuthMethod, EncryptFn};
pub use query::{
    with_plugin_name, with_response, with_scramble, with_username, AuthQuery, QueryOption,
};
pub use scramble::{
    clear_password, generate_scramble, native_password_hash, scramble_native_password,
    verify_native_password, SCRAMBLE_LEN,
};
pub use store::{CredentialStore, StaticCredentialStore};
