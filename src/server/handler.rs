//! Server façade.
//!
//! [`Server`] is what a transport task talks to. It owns the registry, the
//! executor, the authenticator and the parser, and walks a connection
//! through its lifecycle:
//!
//! 1. [`open_session`](Server::open_session) when the socket is accepted
//! 2. [`authenticate`](Server::authenticate) after the handshake response
//! 3. [`handle_query`](Server::handle_query) for every COM_QUERY
//! 4. [`disconnect`](Server::disconnect) when the client goes away
//!
//! [`shutdown`](Server::shutdown) closes every authenticated connection.

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use uuid::Uuid;

use crate::auth::{
    AuthManager, AuthQuery, Authenticator, StaticCredentialStore, StoreVerifier,
    VerifyingAuthManager,
};
use crate::backend::MemoryBackend;
use crate::config::{AuthMode, Config};
use crate::error::{Result, ServerError};
use crate::executor::{Executor, QueryResult, SuppressParseErrors};
use crate::sql::StatementParser;

use super::connection::{Connection, ConnectionIdAllocator, Session};
use super::metrics::ServerMetrics;
use super::registry::ConnectionRegistry;

/// Connection lifecycle and statement dispatch.
pub struct Server {
    registry: Arc<ConnectionRegistry>,
    executor: Executor,
    authenticator: Arc<dyn Authenticator>,
    parser: Arc<dyn StatementParser>,
    metrics: Arc<ServerMetrics>,
    ids: ConnectionIdAllocator,
    /// Connection limit (None = unlimited)
    slots: Option<Arc<Semaphore>>,
    /// Sessions opened here and not yet released, with their slot
    open: DashMap<Uuid, Option<OwnedSemaphorePermit>>,
    server_version: String,
    listen_addr: Option<SocketAddr>,
}

impl Server {
    /// Server with no connection limit.
    pub fn new(
        executor: Executor,
        authenticator: Arc<dyn Authenticator>,
        parser: Arc<dyn StatementParser>,
    ) -> Self {
        Self {
            registry: ConnectionRegistry::shared(),
            executor,
            authenticator,
            parser,
            metrics: ServerMetrics::shared(),
            ids: ConnectionIdAllocator::new(),
            slots: None,
            open: DashMap::new(),
            server_version: crate::config::ServerConfig::default().server_version,
            listen_addr: None,
        }
    }

    /// Build everything from configuration.
    ///
    /// Configured users go into a [`StaticCredentialStore`]. In `lookup`
    /// mode a known username is enough; in `verify` mode the client's
    /// scrambled response is checked too. With no users configured,
    /// `allow_unauthenticated` decides whether everyone or no one gets in.
    /// The reference [`MemoryBackend`] is created with `backend.databases`.
    pub fn from_config(config: &Config, parser: Arc<dyn StatementParser>) -> Result<Self> {
        let listen_addr = config.server.listen_addr().map_err(ServerError::Config)?;
        let store = Arc::new(StaticCredentialStore::from_config(&config.auth)?);

        let authenticator: Arc<dyn Authenticator> = if store.is_empty() {
            Arc::new(AuthManager::new().allow_when_empty(config.auth.allow_unauthenticated))
        } else {
            match config.auth.mode {
                AuthMode::Lookup => Arc::new(AuthManager::strict().with_store(store)),
                AuthMode::Verify => {
                    Arc::new(VerifyingAuthManager::new(Arc::new(StoreVerifier::new(store))))
                }
            }
        };

        let backend = Arc::new(MemoryBackend::with_databases(
            config.backend.databases.iter().cloned(),
        )?);
        let mut executor = Executor::builder().backend(backend);
        if config.backend.suppress_parse_errors {
            executor = executor.reporter(Arc::new(SuppressParseErrors));
        }

        info!(
            listen = %listen_addr,
            users = config.auth.users.len(),
            mode = ?config.auth.mode,
            databases = config.backend.databases.len(),
            max_connections = config.server.max_connections,
            "Server configured"
        );

        Ok(Self::new(executor.build(), authenticator, parser)
            .with_max_connections(config.server.max_connections)
            .with_server_version(config.server.server_version.clone())
            .with_listen_addr(listen_addr))
    }

    /// Cap concurrently open sessions (0 = unlimited).
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.slots = (max_connections > 0).then(|| Arc::new(Semaphore::new(max_connections)));
        self
    }

    /// Version string advertised in the initial handshake.
    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = version.into();
        self
    }

    /// Address the embedding listener should bind.
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = Some(addr);
        self
    }

    pub fn listen_addr(&self) -> Option<SocketAddr> {
        self.listen_addr
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Sessions opened and not yet disconnected, authenticated or not.
    pub fn open_sessions(&self) -> usize {
        self.open.len()
    }

    /// Allocate a session for a freshly accepted socket.
    ///
    /// # Errors
    ///
    /// [`ServerError::Connection`] when the connection limit is reached.
    pub fn open_session(&self, peer: Option<SocketAddr>) -> Result<Arc<Session>> {
        let permit = match &self.slots {
            Some(slots) => match Arc::clone(slots).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!(peer = ?peer, "Connection rejected: max connections reached");
                    return Err(ServerError::Connection("Too many connections".into()));
                }
            },
            None => None,
        };

        let mut session = Session::new(self.ids.allocate());
        if let Some(peer) = peer {
            session = session.with_peer(peer);
        }
        self.open.insert(session.uuid(), permit);
        self.metrics.connection_accepted();

        debug!(conn_id = session.id(), uuid = %session.uuid(), peer = ?peer, "Session opened");
        Ok(Arc::new(session))
    }

    /// Run the authenticator and, on success, register the session.
    ///
    /// A denied session is closed and released.
    ///
    /// # Errors
    ///
    /// [`ServerError::AccessDenied`] when the authenticator refuses.
    pub async fn authenticate(&self, session: &Arc<Session>, query: &AuthQuery) -> Result<()> {
        if !self.authenticator.authenticate(session.as_ref(), query).await {
            self.metrics.auth_failure();
            warn!(conn_id = session.id(), user = %query.username(), "Authentication failed");
            if let Err(e) = self.disconnect(session.as_ref()).await {
                debug!(conn_id = session.id(), error = %e, "Close after failed authentication failed");
            }
            return Err(ServerError::AccessDenied(query.username().to_string()));
        }

        session.set_username(query.username());
        self.registry
            .add(Arc::clone(session) as Arc<dyn Connection>)
            .await;
        self.metrics.auth_success();
        info!(conn_id = session.id(), user = %query.username(), "Client authenticated");
        Ok(())
    }

    /// Parse and execute one query.
    ///
    /// Parse failures go through the executor's error reporter, which either
    /// fails the statement or turns it into an OK with one warning.
    pub async fn handle_query(&self, conn: &dyn Connection, sql: &str) -> Result<QueryResult> {
        let stmt = match self.parser.parse(sql) {
            Ok(stmt) => stmt,
            Err(err) => {
                debug!(conn_id = conn.id(), error = %err, "Parse failed");
                let result = self.executor.report_parse_error(conn, sql, err);
                self.metrics.parse_error(result.is_ok());
                if result.is_err() {
                    self.metrics.statement_error();
                }
                return result;
            }
        };

        match self.executor.execute(conn, &stmt).await {
            Ok(result) => {
                self.metrics.statement_executed();
                Ok(result)
            }
            Err(e) => {
                self.metrics.statement_error();
                debug!(conn_id = conn.id(), kind = stmt.kind(), error = %e, "Statement failed");
                Err(e)
            }
        }
    }

    /// Unregister and close a connection, releasing its slot.
    pub async fn disconnect(&self, conn: &dyn Connection) -> Result<()> {
        self.registry.remove(conn).await;
        let result = conn.close().await;
        self.release(conn.uuid());
        result
    }

    /// Close every registered connection.
    ///
    /// # Errors
    ///
    /// [`ServerError::Shutdown`] with every close failure. Connections that
    /// failed to close stay registered and keep their slot.
    pub async fn shutdown(&self) -> Result<()> {
        let before = self.registry.all().await;
        let result = self.registry.close_all().await;

        for conn in before {
            if self.registry.by_uuid(&conn.uuid()).await.is_none() {
                self.release(conn.uuid());
            }
        }

        match &result {
            Ok(()) => info!("Shutdown complete"),
            Err(e) => error!(error = %e, "Shutdown finished with errors"),
        }
        result
    }

    fn release(&self, uuid: Uuid) {
        if self.open.remove(&uuid).is_some() {
            self.metrics.connection_closed();
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("server_version", &self.server_version)
            .field("listen_addr", &self.listen_addr)
            .field("open_sessions", &self.open.len())
            .finish_non_exhaustive()
    }
}
