//! Delivery error types

use thiserror::Error;

/// Failure to queue an event for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Client queue is full; the event is dropped for this client only
    #[error("client queue full")]
    Full,

    /// Client's connection task is gone; the client must be removed
    #[error("client queue closed")]
    Closed,
}
