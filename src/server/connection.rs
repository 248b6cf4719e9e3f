//! Client connections as seen by the core.
//!
//! The transport layer owns the socket; the core only needs a handle that
//! can report identity, carry the selected database and be closed. That
//! handle is the [`Connection`] trait. [`Session`] is the stock
//! implementation a transport task can use directly.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::error::Result;

/// Handle to one client connection.
///
/// `id() == 0` means the transport has not assigned a numeric id yet. Such
/// connections are still tracked by UUID.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Process-local numeric id, 0 when unassigned.
    fn id(&self) -> u32;

    /// Globally unique id, always present.
    fn uuid(&self) -> Uuid;

    /// Database selected with `USE` (or at handshake), if any.
    fn database(&self) -> Option<String>;

    /// Change the selected database.
    fn set_database(&self, database: Option<String>);

    /// Close the connection. Closing twice is not an error.
    async fn close(&self) -> Result<()>;
}

/// Stock [`Connection`] implementation.
///
/// `close()` flips a flag and wakes every task waiting in
/// [`Session::closed`], which is how a transport loop learns that the
/// server shut it down.
pub struct Session {
    id: u32,
    uuid: Uuid,
    peer: Option<SocketAddr>,
    database: RwLock<Option<String>>,
    username: RwLock<Option<String>>,
    closed: AtomicBool,
    notify: Notify,
}

impl Session {
    /// Create a session with a fresh UUID.
    pub fn new(id: u32) -> Self {
        Self::with_uuid(id, Uuid::new_v4())
    }

    /// Create a session with a caller-supplied UUID.
    pub fn with_uuid(id: u32, uuid: Uuid) -> Self {
        Self {
            id,
            uuid,
            peer: None,
            database: RwLock::new(None),
            username: RwLock::new(None),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Set the client address.
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Set the initial database (from the handshake response).
    pub fn with_database(self, database: impl Into<String>) -> Self {
        *self.database.write() = Some(database.into());
        self
    }

    /// Client address, when known.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Authenticated username, set once authentication succeeds.
    pub fn username(&self) -> Option<String> {
        self.username.read().clone()
    }

    /// Record the authenticated username.
    pub fn set_username(&self, username: impl Into<String>) {
        *self.username.write() = Some(username.into());
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait until the session is closed.
    pub async fn closed(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Connection for Session {
    fn id(&self) -> u32 {
        self.id
    }

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn database(&self) -> Option<String> {
        self.database.read().clone()
    }

    fn set_database(&self, database: Option<String>) {
        *self.database.write() = database;
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(conn_id = self.id, uuid = %self.uuid, "Session closed");
            self.notify.notify_waiters();
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("uuid", &self.uuid)
            .field("peer", &self.peer)
            .field("database", &*self.database.read())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Hands out numeric connection ids.
///
/// Ids start at 1 and never return 0, even after wrapping around.
#[derive(Debug)]
pub struct ConnectionIdAllocator {
    next: AtomicU32,
}

impl ConnectionIdAllocator {
    /// Allocator whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Next id.
    pub fn allocate(&self) -> u32 {
        loop {
            let id = self.next.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return id;
            }
        }
    }
}

impl Default for ConnectionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
