//! Relay loop
//!
//! Single sequential consumer of the frame feed: decode, route and dispatch
//! each frame before taking the next. Nothing that happens to one frame or
//! one client stops the loop.

use std::sync::Arc;

use crate::bus::{FrameFeed, RawFrame};
use crate::record;
use crate::registry::ClientRegistry;
use crate::router::ChannelTable;
use crate::stats::RelayStats;

use super::dispatcher::Dispatcher;

/// Frame-to-client relay
pub struct Relay {
    table: ChannelTable,
    dispatcher: Dispatcher,
    stats: Arc<RelayStats>,
}

impl Relay {
    pub fn new(table: ChannelTable, registry: Arc<ClientRegistry>, stats: Arc<RelayStats>) -> Self {
        let dispatcher = Dispatcher::new(registry, Arc::clone(&stats));
        Self::with_dispatcher(table, dispatcher, stats)
    }

    /// Create a relay around a preconfigured dispatcher
    pub fn with_dispatcher(table: ChannelTable, dispatcher: Dispatcher, stats: Arc<RelayStats>) -> Self {
        Self {
            table,
            dispatcher,
            stats,
        }
    }

    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    /// Consume the feed until it ends
    pub async fn run(&self, mut feed: FrameFeed) {
        tracing::debug!(channels = self.table.len(), "Relay loop started");

        while let Some(frame) = feed.next_frame().await {
            self.process_frame(&frame).await;
        }

        tracing::info!("Frame feed ended, relay loop stopped");
    }

    /// Decode, route and dispatch one frame
    ///
    /// Returns the number of channel events produced. Undecodable frames are
    /// dropped here and yield zero.
    pub async fn process_frame(&self, frame: &RawFrame) -> usize {
        self.stats.record_frame();

        let record = match record::decode(frame) {
            Ok(record) => record,
            Err(e) => {
                self.stats.record_frame_dropped();
                tracing::trace!(error = %e, size = frame.size(), "Dropping undecodable frame");
                return 0;
            }
        };

        let events = self.table.route(&record);
        if events.is_empty() {
            return 0;
        }

        self.stats.record_events_routed(events.len());
        self.dispatcher.dispatch(&events).await;
        events.len()
    }
}
