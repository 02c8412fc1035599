//! Relay statistics

pub mod metrics;
pub mod rate_limit;

pub use metrics::{RelayStats, StatsSnapshot};
pub use rate_limit::RateLimitedLogger;
