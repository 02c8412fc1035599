//! Registry entries
//!
//! An entry is the dispatcher's view of one client: a bounded queue sender
//! and a drop counter. The receiving half lives in the client's own task.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::router::ClientMessage;
use crate::session::{ClientContext, ClientId};

use super::error::DeliveryError;

/// Entry for a single client in the registry
#[derive(Debug)]
pub struct ClientEntry {
    context: ClientContext,
    tx: mpsc::Sender<ClientMessage>,
    dropped: AtomicU64,
}

impl ClientEntry {
    pub(super) fn new(context: ClientContext, tx: mpsc::Sender<ClientMessage>) -> Self {
        Self {
            context,
            tx,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> ClientId {
        self.context.client_id
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Queue a message without waiting
    ///
    /// Never blocks: a full queue drops the message for this client, a closed
    /// queue reports the client gone.
    pub fn deliver(&self, message: ClientMessage) -> Result<(), DeliveryError> {
        match self.tx.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(DeliveryError::Full)
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    /// Messages dropped on overflow for this client
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Whether the client's receiving half is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// What a newly registered client gets back
#[derive(Debug)]
pub struct ClientSubscription {
    /// Client identity, including the registry handle `context.client_id`
    pub context: ClientContext,
    /// Queue of messages to write to the client, in dispatch order
    pub rx: mpsc::Receiver<ClientMessage>,
}

impl ClientSubscription {
    pub fn id(&self) -> ClientId {
        self.context.client_id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Number;

    use super::*;
    use crate::router::ChannelEvent;

    fn message(value: i64) -> ClientMessage {
        ChannelEvent::new("pvdata", Number::from(value)).to_message()
    }

    #[test]
    fn test_deliver_until_full() {
        let (tx, mut rx) = mpsc::channel(2);
        let entry = ClientEntry::new(ClientContext::new(1, None), tx);

        assert_eq!(entry.deliver(message(1)), Ok(()));
        assert_eq!(entry.deliver(message(2)), Ok(()));
        assert_eq!(entry.deliver(message(3)), Err(DeliveryError::Full));
        assert_eq!(entry.dropped_count(), 1);

        assert_eq!(rx.try_recv().unwrap(), message(1));
        assert_eq!(rx.try_recv().unwrap(), message(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_deliver_to_closed() {
        let (tx, rx) = mpsc::channel(2);
        let entry = ClientEntry::new(ClientContext::new(1, None), tx);
        drop(rx);

        assert!(entry.is_closed());
        assert_eq!(entry.deliver(message(1)), Err(DeliveryError::Closed));
        assert_eq!(entry.dropped_count(), 0);
    }
}
