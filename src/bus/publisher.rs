//! Telemetry publisher
//!
//! PUB-side counterpart of [`BusSubscriber`](super::BusSubscriber). Sends
//! `[topic, json]` frames, the shape upstream processes publish.

use bytes::Bytes;
use zeromq::{PubSocket, Socket, SocketSend, ZmqMessage};

use crate::error::{Error, Result};
use crate::record::Record;

use super::config::{BusConfig, BusPosture};
use super::ipc::remove_stale_socket;

/// Publishes telemetry records on the bus
///
/// # Example
/// ```no_run
/// use telemetry_relay::bus::{BusConfig, TelemetryPublisher};
/// use telemetry_relay::record::Record;
///
/// # async fn example() -> telemetry_relay::error::Result<()> {
/// let mut publisher = TelemetryPublisher::open(&BusConfig::connect("ipc:///tmp/relaylog")).await?;
/// publisher.publish("DEBUG", &Record::new().with_float("PV", 21.5)).await?;
/// # Ok(())
/// # }
/// ```
pub struct TelemetryPublisher {
    socket: PubSocket,
    endpoint: String,
}

impl TelemetryPublisher {
    /// Bind or connect the PUB socket according to `config`
    pub async fn open(config: &BusConfig) -> Result<Self> {
        let bus_error = |source: zeromq::ZmqError| Error::Bus {
            endpoint: config.endpoint.clone(),
            source,
        };

        let mut socket = PubSocket::new();
        let endpoint = match config.posture {
            BusPosture::Bind => {
                remove_stale_socket(&config.endpoint).await?;
                socket
                    .bind(&config.endpoint)
                    .await
                    .map(|resolved| resolved.to_string())
                    .map_err(bus_error)?
            }
            BusPosture::Connect => {
                socket.connect(&config.endpoint).await.map_err(bus_error)?;
                config.endpoint.clone()
            }
        };

        tracing::info!(endpoint = %endpoint, posture = %config.posture, "Telemetry publisher ready");

        Ok(Self { socket, endpoint })
    }

    /// Resolved endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Publish a record under `topic`
    pub async fn publish(&mut self, topic: &str, record: &Record) -> Result<()> {
        self.publish_raw(topic, Bytes::from(record.to_json().to_string()))
            .await
    }

    /// Publish an arbitrary payload under `topic`
    pub async fn publish_raw(&mut self, topic: &str, payload: Bytes) -> Result<()> {
        let mut message = ZmqMessage::from(topic.to_string());
        message.push_back(payload);

        self.socket.send(message).await.map_err(|source| Error::Bus {
            endpoint: self.endpoint.clone(),
            source,
        })
    }
}
