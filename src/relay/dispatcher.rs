//! Fan-out dispatcher
//!
//! Hands each channel event to every registered client's queue. Queueing is
//! non-blocking, so one stuck client costs the relay loop a failed
//! `try_send` and nothing more.

use std::sync::Arc;
use std::time::Duration;

use crate::registry::{ClientRegistry, DeliveryError};
use crate::router::ChannelEvent;
use crate::session::ClientId;
use crate::stats::{RateLimitedLogger, RelayStats};

/// Outcome of one dispatch call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Clients in the snapshot
    pub clients: usize,
    /// Messages queued
    pub delivered: usize,
    /// Messages dropped on full queues
    pub dropped: usize,
    /// Clients removed because their queue was closed
    pub removed: Vec<ClientId>,
}

/// Delivers channel events to all registered clients
pub struct Dispatcher {
    registry: Arc<ClientRegistry>,
    stats: Arc<RelayStats>,
    overflow_log: RateLimitedLogger,
}

impl Dispatcher {
    pub fn new(registry: Arc<ClientRegistry>, stats: Arc<RelayStats>) -> Self {
        Self::with_overflow_log_interval(registry, stats, crate::stats::rate_limit::DEFAULT_LOG_INTERVAL)
    }

    /// Create a dispatcher with a custom interval between overflow warnings
    pub fn with_overflow_log_interval(
        registry: Arc<ClientRegistry>,
        stats: Arc<RelayStats>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            stats,
            overflow_log: RateLimitedLogger::new(interval),
        }
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Deliver `events`, in order, to every client registered right now
    ///
    /// A client whose queue turns out closed is unregistered and skipped for
    /// the remaining events.
    pub async fn dispatch(&self, events: &[ChannelEvent]) -> DispatchReport {
        let clients = self.registry.snapshot().await;
        let mut report = DispatchReport {
            clients: clients.len(),
            ..Default::default()
        };

        if clients.is_empty() || events.is_empty() {
            return report;
        }

        for event in events {
            let message = event.to_message();

            for client in &clients {
                if report.removed.contains(&client.id()) {
                    continue;
                }

                match client.deliver(message.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(DeliveryError::Full) => {
                        report.dropped += 1;
                        if let Some(suppressed) = self.overflow_log.hit() {
                            tracing::warn!(
                                client_id = client.id(),
                                channel = message.channel(),
                                client_dropped = client.dropped_count(),
                                suppressed = suppressed,
                                "Client queue full, dropping event"
                            );
                        }
                    }
                    Err(DeliveryError::Closed) => report.removed.push(client.id()),
                }
            }
        }

        // Release our references before removal so the queues close promptly
        drop(clients);

        for &client_id in &report.removed {
            if self.registry.unregister(client_id).await {
                self.stats.record_client_removed();
                tracing::debug!(client_id = client_id, "Client removed after send failure");
            }
        }

        self.stats.record_deliveries(report.delivered, report.dropped);
        report
    }
}
