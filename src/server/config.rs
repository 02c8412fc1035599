//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::router::ChannelTable;
use crate::stats::rate_limit::DEFAULT_LOG_INTERVAL;

/// Default HTTP/WebSocket port
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind_addr: SocketAddr,

    /// Directory holding `index.html` and the `vendor/` assets
    pub asset_dir: PathBuf,

    /// How often relay counters are logged
    pub stats_interval: Duration,

    /// Minimum time between client overflow warnings
    pub overflow_log_interval: Duration,

    /// Record fields forwarded to clients, and their event names
    pub channels: ChannelTable,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            asset_dir: PathBuf::from("web"),
            stats_interval: Duration::from_secs(30),
            overflow_log_interval: DEFAULT_LOG_INTERVAL,
            channels: ChannelTable::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the asset directory
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Set the stats logging interval (at least one second)
    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval.max(Duration::from_secs(1));
        self
    }

    /// Set the minimum time between overflow warnings
    pub fn overflow_log_interval(mut self, interval: Duration) -> Self {
        self.overflow_log_interval = interval;
        self
    }

    /// Replace the channel table
    pub fn channels(mut self, channels: ChannelTable) -> Self {
        self.channels = channels;
        self
    }
}
