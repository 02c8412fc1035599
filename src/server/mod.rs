//! Relay server
//!
//! HTTP surface, WebSocket upgrade and startup wiring.

pub mod config;
pub mod listener;
pub mod routes;

pub use config::ServerConfig;
pub use listener::RelayServer;
pub use routes::{build_router, AppState, LIVE_PATH};
