//! Connection registry.
//!
//! Indexes live connections by numeric id and by UUID. Both maps sit under a
//! single [`tokio::sync::RwLock`] so they can never disagree: lookups take
//! the read side, `add`/`remove` take the write side.
//!
//! Invariants:
//! - a connection is in the UUID map iff it was added and not removed since
//! - it is in the id map iff, in addition, it was added with a nonzero id
//!   and no later connection was added with the same id
//! - a later `add` with an id already in use takes over the id key; the
//!   earlier connection stays reachable by UUID only
//!
//! [`ConnectionRegistry::close_all`] is the shutdown path. Every connection
//! gets a close attempt even if earlier ones fail, and all failures come
//! back together in one [`ServerError::Shutdown`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, ServerError};

use super::connection::Connection;

#[derive(Default)]
struct Maps {
    by_id: HashMap<u32, Arc<dyn Connection>>,
    by_uuid: HashMap<Uuid, Arc<dyn Connection>>,
}

impl Maps {
    fn remove(&mut self, id: u32, uuid: Uuid) -> bool {
        let removed = self.by_uuid.remove(&uuid).is_some();
        // Only drop the id entry if it still belongs to this connection
        if id != 0
            && self
                .by_id
                .get(&id)
                .map(|c| c.uuid() == uuid)
                .unwrap_or(false)
        {
            self.by_id.remove(&id);
        }
        removed
    }
}

/// Concurrent index of live connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    maps: RwLock<Maps>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared registry.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Track a connection.
    ///
    /// Re-adding the same UUID replaces the previous entry. A different
    /// connection already holding `id` loses its id key.
    pub async fn add(&self, conn: Arc<dyn Connection>) {
        let id = conn.id();
        let uuid = conn.uuid();
        let mut maps = self.maps.write().await;
        if let Some(previous) = maps.by_uuid.get(&uuid).map(|c| c.id()) {
            maps.remove(previous, uuid);
        }
        if id != 0 {
            if let Some(displaced) = maps.by_id.insert(id, Arc::clone(&conn)) {
                warn!(conn_id = id, uuid = %uuid, displaced = %displaced.uuid(), "Connection id reassigned");
            }
        }
        maps.by_uuid.insert(uuid, conn);
        debug!(conn_id = id, uuid = %uuid, total = maps.by_uuid.len(), "Connection registered");
    }

    /// Look up by numeric id.
    pub async fn by_id(&self, id: u32) -> Option<Arc<dyn Connection>> {
        self.maps.read().await.by_id.get(&id).cloned()
    }

    /// Look up by UUID.
    pub async fn by_uuid(&self, uuid: &Uuid) -> Option<Arc<dyn Connection>> {
        self.maps.read().await.by_uuid.get(uuid).cloned()
    }

    /// Snapshot of every tracked connection.
    ///
    /// The lock is released before returning, so the caller may await on
    /// the connections freely.
    pub async fn all(&self) -> Vec<Arc<dyn Connection>> {
        self.maps.read().await.by_uuid.values().cloned().collect()
    }

    /// Number of tracked connections.
    pub async fn len(&self) -> usize {
        self.maps.read().await.by_uuid.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.maps.read().await.by_uuid.is_empty()
    }

    /// Stop tracking a connection. No-op if it is not tracked.
    pub async fn remove(&self, conn: &dyn Connection) {
        let id = conn.id();
        let uuid = conn.uuid();
        let mut maps = self.maps.write().await;
        if maps.remove(id, uuid) {
            debug!(conn_id = id, uuid = %uuid, total = maps.by_uuid.len(), "Connection unregistered");
        }
    }

    /// Remove the connection tracked under `id`, returning it.
    pub async fn remove_by_id(&self, id: u32) -> Option<Arc<dyn Connection>> {
        let mut maps = self.maps.write().await;
        let conn = maps.by_id.get(&id).cloned()?;
        maps.remove(conn.id(), conn.uuid());
        debug!(conn_id = id, uuid = %conn.uuid(), "Connection unregistered by id");
        Some(conn)
    }

    /// Remove the connection tracked under `uuid`, returning it.
    pub async fn remove_by_uuid(&self, uuid: &Uuid) -> Option<Arc<dyn Connection>> {
        let mut maps = self.maps.write().await;
        let conn = maps.by_uuid.get(uuid).cloned()?;
        maps.remove(conn.id(), conn.uuid());
        debug!(conn_id = conn.id(), uuid = %uuid, "Connection unregistered by uuid");
        Some(conn)
    }

    /// Close and unregister every connection.
    ///
    /// Connections that fail to close stay registered.
    ///
    /// # Errors
    ///
    /// [`ServerError::Shutdown`] carrying every close failure.
    pub async fn close_all(&self) -> Result<()> {
        let conns = self.all().await;
        info!(count = conns.len(), "Closing all connections");

        let mut errors = Vec::new();
        for conn in conns {
            match conn.close().await {
                Ok(()) => self.remove(conn.as_ref()).await,
                Err(e) => {
                    warn!(conn_id = conn.id(), uuid = %conn.uuid(), error = %e, "Failed to close connection");
                    errors.push(e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Shutdown(errors))
        }
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry").finish_non_exhaustive()
    }
}
