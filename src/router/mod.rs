//! Field routing
//!
//! Turns a decoded [`Record`](crate::record::Record) into zero or more
//! [`ChannelEvent`]s according to a [`ChannelTable`].

pub mod event;
pub mod table;

pub use event::{ChannelEvent, ClientMessage};
pub use table::{ChannelMapping, ChannelTable};
