//! Relay core
//!
//! ```text
//!   FrameFeed ──► decode ──► ChannelTable::route ──► Dispatcher ──► client queues
//! ```

pub mod dispatcher;
pub mod engine;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use engine::Relay;
