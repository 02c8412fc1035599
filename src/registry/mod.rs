//! Client registry for fan-out
//!
//! Tracks connected clients and owns the sending half of each client's
//! bounded queue.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<ClientRegistry>
//!                     ┌──────────────────────────┐
//!                     │ clients: HashMap<Id,     │
//!                     │   ClientEntry {          │
//!                     │     tx: mpsc::Sender,    │
//!                     │   }                      │
//!                     │ >                        │
//!                     └────────────┬─────────────┘
//!                                  │
//!         ┌────────────────────────┼────────────────────────┐
//!         │                        │                        │
//!         ▼                        ▼                        ▼
//!    [Relay loop]             [Client task]            [Client task]
//!    snapshot()               rx.recv()                rx.recv()
//!         │                        │                        │
//!         └──► entry.deliver() ────┴──► WebSocket ──────────┘
//! ```
//!
//! Delivery is `try_send`: the relay loop never waits on a client. A full
//! queue loses that event for that client only; a closed queue removes the
//! client.

pub mod config;
pub mod entry;
pub mod error;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{ClientEntry, ClientSubscription};
pub use error::DeliveryError;
pub use store::ClientRegistry;
