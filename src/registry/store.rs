//! Client registry implementation
//!
//! The one piece of state shared between connection tasks (register,
//! unregister) and the relay loop (snapshot). Entries are inserted fully
//! built under the write lock, so a snapshot never sees half a client.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::session::{ClientContext, ClientId};

use super::config::RegistryConfig;
use super::entry::{ClientEntry, ClientSubscription};

/// Registry of connected clients
///
/// Thread-safe via `RwLock`. Dispatch takes the read lock once per record;
/// connects and disconnects take the write lock briefly.
pub struct ClientRegistry {
    /// Map of client ID to entry
    clients: RwLock<HashMap<ClientId, Arc<ClientEntry>>>,

    next_client_id: AtomicU64,

    config: RegistryConfig,
}

impl ClientRegistry {
    /// Create a registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_client_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a new client
    ///
    /// Allocates its queue and returns the receiving half together with the
    /// client's identity. The client starts receiving with the next dispatch.
    pub async fn register(&self, peer_addr: Option<SocketAddr>) -> ClientSubscription {
        let client_id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let context = ClientContext::new(client_id, peer_addr);
        let (tx, rx) = mpsc::channel(self.config.client_queue_capacity);
        let entry = Arc::new(ClientEntry::new(context.clone(), tx));

        let mut clients = self.clients.write().await;
        clients.insert(client_id, entry);

        tracing::debug!(
            client_id = client_id,
            peer = ?peer_addr,
            clients = clients.len(),
            "Client registered"
        );

        ClientSubscription { context, rx }
    }

    /// Remove a client
    ///
    /// Idempotent: returns `true` only for the call that actually removed
    /// it. Dropping the entry closes the client's queue once any in-flight
    /// snapshot releases it.
    pub async fn unregister(&self, client_id: ClientId) -> bool {
        let mut clients = self.clients.write().await;

        match clients.remove(&client_id) {
            Some(entry) => {
                tracing::debug!(
                    client_id = client_id,
                    dropped = entry.dropped_count(),
                    clients = clients.len(),
                    "Client unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Clients registered at this instant, in no particular order
    pub async fn snapshot(&self) -> Vec<Arc<ClientEntry>> {
        self.clients.read().await.values().cloned().collect()
    }

    /// Whether a client is registered
    pub async fn contains(&self, client_id: ClientId) -> bool {
        self.clients.read().await.contains_key(&client_id)
    }

    /// Number of registered clients
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Remove every client, closing their queues
    ///
    /// Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut clients = self.clients.write().await;
        let count = clients.len();
        clients.clear();

        if count > 0 {
            tracing::info!(clients = count, "Registry cleared");
        }
        count
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
