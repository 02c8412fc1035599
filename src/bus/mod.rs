//! Pub/sub bus plumbing
//!
//! The relay consumes one inbound stream of frames from a ZeroMQ SUB socket.
//! The socket lives in its own task and hands frames to the relay loop
//! through a bounded [`FrameFeed`], so socket I/O and relay work never share
//! a call stack.
//!
//! ```text
//!   publisher ──► SUB socket ──► receive task ──► FrameFeed ──► relay loop
//! ```

pub mod config;
pub mod frame;
pub mod ipc;
pub mod publisher;
pub mod subscriber;

pub use config::{BusConfig, BusPosture, DEFAULT_ENDPOINT};
pub use frame::{FrameFeed, FrameSender, RawFrame};
pub use publisher::TelemetryPublisher;
pub use subscriber::BusSubscriber;
