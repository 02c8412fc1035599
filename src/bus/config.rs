//! Bus endpoint configuration
//!
//! Endpoints use the CZMQ prefix convention: `@tcp://...` binds and
//! `>tcp://...` connects. An unprefixed endpoint binds.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Endpoint the relay binds to when the operator supplies none
pub const DEFAULT_ENDPOINT: &str = "ipc:///tmp/relaylog";

/// Frames buffered between the bus socket and the relay loop
pub const DEFAULT_FRAME_BUFFER: usize = 1024;

/// How the subscriber attaches to the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusPosture {
    /// Listen on the endpoint; publishers connect in
    Bind,
    /// Connect out to a publisher listening on the endpoint
    Connect,
}

impl fmt::Display for BusPosture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusPosture::Bind => f.write_str("bind"),
            BusPosture::Connect => f.write_str("connect"),
        }
    }
}

/// Bus subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Transport address without posture prefix (e.g. `tcp://127.0.0.1:2001`)
    pub endpoint: String,

    /// Bind or connect
    pub posture: BusPosture,

    /// Capacity of the frame feed between the socket task and the relay loop
    pub frame_buffer: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            posture: BusPosture::Bind,
            frame_buffer: DEFAULT_FRAME_BUFFER,
        }
    }
}

impl BusConfig {
    /// Bind to the given endpoint
    pub fn bind(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            posture: BusPosture::Bind,
            ..Default::default()
        }
    }

    /// Connect out to the given endpoint
    pub fn connect(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            posture: BusPosture::Connect,
            ..Default::default()
        }
    }

    /// Set the frame feed capacity
    pub fn frame_buffer(mut self, capacity: usize) -> Self {
        self.frame_buffer = capacity.max(1);
        self
    }
}

impl fmt::Display for BusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.posture {
            BusPosture::Bind => write!(f, "@{}", self.endpoint),
            BusPosture::Connect => write!(f, ">{}", self.endpoint),
        }
    }
}

impl FromStr for BusConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (posture, endpoint) = if let Some(rest) = s.strip_prefix('@') {
            (BusPosture::Bind, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (BusPosture::Connect, rest)
        } else {
            (BusPosture::Bind, s)
        };

        match endpoint.split_once("://") {
            Some((scheme, addr)) if !scheme.is_empty() && !addr.is_empty() => Ok(Self {
                endpoint: endpoint.to_string(),
                posture,
                ..Default::default()
            }),
            _ => Err(Error::InvalidEndpoint(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BusConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.posture, BusPosture::Bind);
        assert_eq!(config.frame_buffer, DEFAULT_FRAME_BUFFER);
    }

    #[test]
    fn test_parse_unprefixed_binds() {
        let config: BusConfig = "tcp://0.0.0.0:2001".parse().unwrap();

        assert_eq!(config.endpoint, "tcp://0.0.0.0:2001");
        assert_eq!(config.posture, BusPosture::Bind);
    }

    #[test]
    fn test_parse_prefixes() {
        let bind: BusConfig = "@ipc:///tmp/relaylog".parse().unwrap();
        assert_eq!(bind.posture, BusPosture::Bind);
        assert_eq!(bind.endpoint, "ipc:///tmp/relaylog");

        let connect: BusConfig = ">tcp://127.0.0.1:2001".parse().unwrap();
        assert_eq!(connect.posture, BusPosture::Connect);
        assert_eq!(connect.endpoint, "tcp://127.0.0.1:2001");
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        for bad in ["", "@", ">127.0.0.1:2001", "tcp://", "://host"] {
            let result = bad.parse::<BusConfig>();
            assert!(
                matches!(result, Err(Error::InvalidEndpoint(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_posture() {
        let config = BusConfig::connect("tcp://127.0.0.1:2001");
        assert_eq!(config.to_string(), ">tcp://127.0.0.1:2001");

        let parsed: BusConfig = config.to_string().parse().unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_frame_buffer_floor() {
        let config = BusConfig::default().frame_buffer(0);
        assert_eq!(config.frame_buffer, 1);
    }
}
