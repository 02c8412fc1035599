//! Error types
//!
//! Only startup resource acquisition is allowed to fail the relay. Per-frame
//! and per-client failures have their own types and never reach [`Error`].

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal relay errors
#[derive(Debug, Error)]
pub enum Error {
    /// The bus endpoint could not be bound, connected or subscribed
    #[error("bus endpoint {endpoint} unavailable: {source}")]
    Bus {
        endpoint: String,
        #[source]
        source: zeromq::ZmqError,
    },

    /// The bus endpoint string is not usable
    #[error("invalid bus endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// Socket or HTTP listener failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
