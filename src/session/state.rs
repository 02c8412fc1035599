//! Client session bookkeeping
//!
//! Counters kept by the connection task and reported when the client leaves.
//! Removal itself is owned by the registry: whichever of the connection task
//! or the dispatcher unregisters first is the one that counts it.

use super::context::ClientContext;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Client sent a close frame or the stream ended
    Closed,
    /// Reading from the client failed
    ReadError,
    /// Writing to the client failed
    WriteError,
    /// The registry dropped the client's queue (dispatcher or shutdown)
    Evicted,
}

/// Per-connection session bookkeeping
#[derive(Debug)]
pub struct ClientSession {
    context: ClientContext,
    events_sent: u64,
    inbound_events: u64,
}

impl ClientSession {
    pub fn new(context: ClientContext) -> Self {
        Self {
            context,
            events_sent: 0,
            inbound_events: 0,
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Count an event written to the client
    pub fn on_event_sent(&mut self) {
        self.events_sent += 1;
    }

    /// Count an event received from the client
    pub fn on_inbound_event(&mut self) {
        self.inbound_events += 1;
    }

    pub fn events_sent(&self) -> u64 {
        self.events_sent
    }

    pub fn inbound_events(&self) -> u64 {
        self.inbound_events
    }
}
