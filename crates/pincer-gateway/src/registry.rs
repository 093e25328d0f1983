//! Connection registry — the set of currently-open client connections.
//!
//! Invariant: the registry's keys are exactly the identities of open
//! connections. Entries are inserted on handshake and removed on close or
//! error; removal is idempotent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use pincer_core::ServerFrame;

/// One registered connection: its outbound frame queue and creation time.
pub struct ConnectionHandle {
    sender: mpsc::Sender<ServerFrame>,
    pub connected_at: DateTime<Utc>,
}

/// Thread-safe registry of live connections, keyed by identity.
pub struct ConnectionRegistry {
    inner: RwLock<HashMap<String, ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection under `id`.
    pub async fn register(&self, id: &str, sender: mpsc::Sender<ServerFrame>) {
        let handle = ConnectionHandle {
            sender,
            connected_at: Utc::now(),
        };
        self.inner.write().await.insert(id.to_string(), handle);
        debug!(client = %id, "connection registered");
    }

    /// Remove a connection. Idempotent — removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.inner.write().await.remove(id).is_some();
        if removed {
            debug!(client = %id, "connection removed");
        }
        removed
    }

    /// Whether `id` is currently registered.
    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.contains_key(id)
    }

    /// Number of live connections.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Deliver a frame to one connection. Returns false if the id is absent
    /// or its channel is no longer writable.
    pub async fn send_to(&self, id: &str, frame: ServerFrame) -> bool {
        let guard = self.inner.read().await;
        let Some(handle) = guard.get(id) else {
            return false;
        };
        if handle.sender.send(frame).await.is_err() {
            warn!(client = %id, "connection channel closed, dropping frame");
            return false;
        }
        true
    }

    /// Deliver a frame to every live connection.
    ///
    /// Connections whose channel has closed are skipped, not errored —
    /// close may race with broadcast. Returns the number of deliveries.
    pub async fn broadcast(&self, frame: ServerFrame) -> usize {
        let guard = self.inner.read().await;
        let mut delivered = 0;
        for (id, handle) in guard.iter() {
            if handle.sender.send(frame.clone()).await.is_ok() {
                delivered += 1;
            } else {
                warn!(client = %id, "skipping unwritable connection in broadcast");
            }
        }
        delivered
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
