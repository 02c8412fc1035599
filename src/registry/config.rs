//! Registry configuration

/// Default per-client queue capacity, in events
pub const DEFAULT_CLIENT_QUEUE_CAPACITY: usize = 256;

/// Client registry options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Events buffered per client before new events are dropped for it
    pub client_queue_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            client_queue_capacity: DEFAULT_CLIENT_QUEUE_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Set the per-client queue capacity (at least 1)
    pub fn client_queue_capacity(mut self, capacity: usize) -> Self {
        self.client_queue_capacity = capacity.max(1);
        self
    }
}
