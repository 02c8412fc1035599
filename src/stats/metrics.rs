//! Relay counters
//!
//! Written from the relay loop and from every client task, so all counters
//! are relaxed atomics. Read them through [`RelayStats::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live relay counters
#[derive(Debug)]
pub struct RelayStats {
    started_at: Instant,
    frames_received: AtomicU64,
    frames_dropped: AtomicU64,
    events_routed: AtomicU64,
    deliveries: AtomicU64,
    deliveries_dropped: AtomicU64,
    clients_connected: AtomicU64,
    clients_removed: AtomicU64,
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            frames_received: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            events_routed: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            deliveries_dropped: AtomicU64::new(0),
            clients_connected: AtomicU64::new(0),
            clients_removed: AtomicU64::new(0),
        }
    }

    pub fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Frame that decoded to no record
    pub fn record_frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_events_routed(&self, count: usize) {
        self.events_routed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_deliveries(&self, delivered: usize, dropped: usize) {
        self.deliveries.fetch_add(delivered as u64, Ordering::Relaxed);
        self.deliveries_dropped
            .fetch_add(dropped as u64, Ordering::Relaxed);
    }

    pub fn record_client_connected(&self) {
        self.clients_connected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_client_removed(&self) {
        self.clients_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the counters were created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            events_routed: self.events_routed.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            deliveries_dropped: self.deliveries_dropped.load(Ordering::Relaxed),
            clients_connected: self.clients_connected.load(Ordering::Relaxed),
            clients_removed: self.clients_removed.load(Ordering::Relaxed),
            uptime: self.uptime(),
        }
    }
}

/// Copy of the relay counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames taken from the bus
    pub frames_received: u64,
    /// Frames that produced no record
    pub frames_dropped: u64,
    /// Channel events produced by the router
    pub events_routed: u64,
    /// Events queued to a client
    pub deliveries: u64,
    /// Events discarded because a client queue was full
    pub deliveries_dropped: u64,
    /// Clients accepted since start
    pub clients_connected: u64,
    /// Clients removed since start
    pub clients_removed: u64,
    /// Relay uptime
    pub uptime: Duration,
}

impl StatsSnapshot {
    /// Clients currently connected according to the counters
    pub fn active_clients(&self) -> u64 {
        self.clients_connected.saturating_sub(self.clients_removed)
    }
}
