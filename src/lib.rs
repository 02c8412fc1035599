//! Telemetry relay
//!
//! Bridges a ZeroMQ telemetry bus to live WebSocket clients. Every frame on
//! the bus is decoded as a JSON record, the configured fields are projected
//! into named channel events, and each event is fanned out to every
//! connected client.
//!
//! ```text
//!   SUB socket ─► FrameFeed ─► decode ─► route ─► Dispatcher ─┬─► client queue ─► WebSocket
//!                                                             ├─► client queue ─► WebSocket
//!                                                             └─► client queue ─► WebSocket
//! ```
//!
//! Frames are processed one at a time, in arrival order. Each client has its
//! own bounded queue and task, so a slow or dead client only ever loses its
//! own events.
//!
//! # Example
//!
//! ```no_run
//! use telemetry_relay::{BusConfig, RelayServer, ServerConfig};
//!
//! # async fn example() -> telemetry_relay::error::Result<()> {
//! let server = RelayServer::new(ServerConfig::default(), BusConfig::default());
//! server.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod error;
pub mod record;
pub mod registry;
pub mod relay;
pub mod router;
pub mod server;
pub mod session;
pub mod stats;

pub use bus::{BusConfig, BusPosture, BusSubscriber, FrameFeed, RawFrame, TelemetryPublisher};
pub use error::{Error, Result};
pub use record::{decode, DecodeError, Record};
pub use registry::{ClientRegistry, RegistryConfig};
pub use relay::{Dispatcher, Relay};
pub use router::{ChannelEvent, ChannelTable};
pub use server::{RelayServer, ServerConfig};
pub use stats::{RelayStats, StatsSnapshot};
