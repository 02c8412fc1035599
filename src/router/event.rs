//! Channel events and their wire encoding

use std::sync::Arc;

use serde_json::{json, Number, Value};

/// One routed value destined for every connected client
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEvent {
    /// Client-facing event name (e.g. `pvdata`)
    pub channel: Arc<str>,
    /// Value copied from the record
    pub value: Number,
}

impl ChannelEvent {
    pub fn new(channel: impl Into<Arc<str>>, value: Number) -> Self {
        Self {
            channel: channel.into(),
            value,
        }
    }

    /// Event payload: `{"y": <value>}`
    pub fn payload(&self) -> Value {
        json!({ "y": self.value })
    }

    /// Encode once for delivery to any number of clients
    pub fn to_message(&self) -> ClientMessage {
        let text = json!({ "event": &*self.channel, "data": self.payload() }).to_string();
        ClientMessage {
            channel: Arc::clone(&self.channel),
            text: text.into(),
        }
    }
}

/// Encoded event as queued for a client
///
/// Text frame body `{"event": <name>, "data": {"y": <value>}}`. Cloning shares
/// the encoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    channel: Arc<str>,
    text: Arc<str>,
}

impl ClientMessage {
    /// Event name
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Encoded text frame
    pub fn text(&self) -> &str {
        &self.text
    }
}
