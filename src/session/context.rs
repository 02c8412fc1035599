//! Client context
//!
//! Identity of one connected client, shared between the registry entry and
//! the connection task.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Registry-assigned client identifier; never reused within a process
pub type ClientId = u64;

/// Read-only information about a connected client
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Unique client ID
    pub client_id: ClientId,

    /// Remote peer address, when the transport has one
    pub peer_addr: Option<SocketAddr>,

    /// When the client was registered
    pub connected_at: Instant,
}

impl ClientContext {
    pub fn new(client_id: ClientId, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            client_id,
            peer_addr,
            connected_at: Instant::now(),
        }
    }

    /// Time since registration
    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
