//! WebSocket client connection
//!
//! One task per client. The task registers the client, then writes its
//! queue to the socket while logging whatever the client sends. The first of
//! close, read error, write error or eviction ends the session, and the
//! client is unregistered on the way out.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use crate::registry::ClientRegistry;
use crate::stats::RelayStats;

use super::state::{ClientSession, DisconnectReason};

/// Named event sent upstream by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl InboundEvent {
    /// Parse a client text frame; `None` if it is not a named event object
    pub fn parse(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Serve one upgraded client connection until it ends
pub async fn run_client(
    socket: WebSocket,
    peer_addr: SocketAddr,
    registry: Arc<ClientRegistry>,
    stats: Arc<RelayStats>,
) {
    let subscription = registry.register(Some(peer_addr)).await;
    stats.record_client_connected();

    let client_id = subscription.id();
    let mut rx = subscription.rx;
    let mut session = ClientSession::new(subscription.context);

    tracing::info!(client_id = client_id, peer = %peer_addr, "Client connected");

    let (mut sink, mut stream) = socket.split();

    let reason = loop {
        tokio::select! {
            outbound = rx.recv() => {
                let Some(message) = outbound else {
                    break DisconnectReason::Evicted;
                };
                if let Err(e) = sink.send(Message::Text(message.text().into())).await {
                    tracing::debug!(client_id = client_id, error = %e, "Client write failed");
                    break DisconnectReason::WriteError;
                }
                session.on_event_sent();
            }

            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        session.on_inbound_event();
                        match InboundEvent::parse(text.as_str()) {
                            Some(event) => tracing::debug!(
                                client_id = client_id,
                                event = %event.event,
                                data = %event.data,
                                "Client event"
                            ),
                            None => tracing::debug!(
                                client_id = client_id,
                                len = text.as_str().len(),
                                "Ignoring unrecognized client message"
                            ),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break DisconnectReason::Closed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(client_id = client_id, error = %e, "Client read failed");
                        break DisconnectReason::ReadError;
                    }
                }
            }
        }
    };

    if registry.unregister(client_id).await {
        stats.record_client_removed();
    }

    let _ = sink.close().await;

    tracing::info!(
        client_id = client_id,
        peer = %peer_addr,
        reason = ?reason,
        events_sent = session.events_sent(),
        inbound_events = session.inbound_events(),
        connected_secs = session.context().connected_for().as_secs(),
        "Client disconnected"
    );
}
