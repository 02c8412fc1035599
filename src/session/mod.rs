//! Client sessions
//!
//! Everything about one connected client: its identity, its counters and
//! the connection task that moves queued events onto the WebSocket.

pub mod context;
pub mod state;
pub mod websocket;

pub use context::{ClientContext, ClientId};
pub use state::{ClientSession, DisconnectReason};
pub use websocket::{run_client, InboundEvent};
