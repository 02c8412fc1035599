//! Bus subscriber
//!
//! Owns the SUB socket, subscribes to every topic and pushes each inbound
//! message into a [`FrameFeed`]. Establishing the socket is fallible and
//! fatal; once running, receive errors are logged and the loop continues.

use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use zeromq::{Socket, SocketRecv, SubSocket, ZmqMessage, ZmqResult};

use crate::error::{Error, Result};

use super::config::{BusConfig, BusPosture};
use super::frame::{FrameFeed, FrameSender, RawFrame};
use super::ipc::remove_stale_socket;

/// Pause after a receive error before polling the socket again
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Subscribed bus socket, ready to be spawned
pub struct BusSubscriber {
    socket: SubSocket,
    endpoint: String,
    posture: BusPosture,
    frame_buffer: usize,
}

impl BusSubscriber {
    /// Bind or connect according to `config` and subscribe to all topics
    pub async fn open(config: &BusConfig) -> Result<Self> {
        let bus_error = |source: zeromq::ZmqError| Error::Bus {
            endpoint: config.endpoint.clone(),
            source,
        };

        let mut socket = SubSocket::new();
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

        socket.subscribe("").await.map_err(bus_error)?;

        tracing::info!(
            endpoint = %endpoint,
            posture = %config.posture,
            "Bus subscriber ready"
        );

        Ok(Self {
            socket,
            endpoint,
            posture: config.posture,
            frame_buffer: config.frame_buffer,
        })
    }

    /// Resolved endpoint (a bound `tcp://host:0` reports the real port)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the socket was bound or connected
    pub fn posture(&self) -> BusPosture {
        self.posture
    }

    /// Start receiving in a background task
    ///
    /// Returns the feed of frames and the handle of the receive task. The
    /// task stops when the feed is dropped.
    pub fn spawn(self) -> (FrameFeed, JoinHandle<()>) {
        let (tx, feed) = FrameFeed::channel(self.frame_buffer);
        let messages = futures::stream::unfold(self.socket, |mut socket| async move {
            let result = socket.recv().await;
            Some((result, socket))
        });
        let handle = tokio::spawn(forward_frames(Box::pin(messages), self.endpoint, tx));
        (feed, handle)
    }
}

/// Push received messages into the feed until the feed is closed
///
/// Receive errors are logged and followed by a short pause; they never end
/// the loop on their own. The loop also ends if `messages` runs out.
async fn forward_frames<S>(mut messages: S, endpoint: String, tx: FrameSender)
where
    S: Stream<Item = ZmqResult<ZmqMessage>> + Unpin,
{
    while let Some(result) = messages.next().await {
        match result {
            Ok(message) => {
                if tx.send(RawFrame::from(message)).await.is_err() {
                    tracing::debug!(endpoint = %endpoint, "Frame feed closed, stopping bus subscriber");
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Bus receive error");
                if tx.is_closed() {
                    break;
                }
                tokio::time::sleep(RECV_ERROR_BACKOFF).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tokio::time::timeout;
    use zeromq::ZmqError;

    use super::*;

    fn reset() -> ZmqError {
        ZmqError::Network(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
    }

    fn message(payload: &str) -> ZmqMessage {
        ZmqMessage::from(payload.to_string())
    }

    #[tokio::test]
    async fn test_receive_error_does_not_stop_forwarding() {
        let messages = futures::stream::iter(vec![
            Ok(message(r#"{"PV": 1}"#)),
            Err(reset()),
            Ok(message(r#"{"PV": 2}"#)),
        ])
        .chain(futures::stream::repeat_with(|| Err(reset())));

        let (tx, mut feed) = FrameFeed::channel(4);
        let handle = tokio::spawn(forward_frames(
            Box::pin(messages),
            "inproc://test".to_string(),
            tx,
        ));

        let first = timeout(Duration::from_secs(5), feed.next_frame()).await.unwrap();
        assert_eq!(first, Some(RawFrame::single(r#"{"PV": 1}"#)));
        let second = timeout(Duration::from_secs(5), feed.next_frame()).await.unwrap();
        assert_eq!(second, Some(RawFrame::single(r#"{"PV": 2}"#)));

        // Errors keep coming; only closing the feed ends the loop
        drop(feed);
        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_forwarding_ends_with_the_stream() {
        let messages = futures::stream::iter(vec![Ok(message("{}"))]);

        let (tx, mut feed) = FrameFeed::channel(4);
        forward_frames(Box::pin(messages), "inproc://test".to_string(), tx).await;

        assert_eq!(feed.next_frame().await, Some(RawFrame::single("{}")));
        assert_eq!(feed.next_frame().await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bind_replaces_stale_ipc_socket() {
        let path = std::env::temp_dir().join(format!("relay-stale-sub-{}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());

        let endpoint = format!("ipc://{}", path.display());
        let subscriber = BusSubscriber::open(&BusConfig::bind(endpoint.as_str()))
            .await
            .unwrap();
        assert_eq!(subscriber.posture(), BusPosture::Bind);

        drop(subscriber);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_bind_resolves_port() {
        let subscriber = BusSubscriber::open(&BusConfig::bind("tcp://127.0.0.1:0"))
            .await
            .unwrap();

        assert_eq!(subscriber.posture(), BusPosture::Bind);
        assert!(subscriber.endpoint().starts_with("tcp://127.0.0.1:"));
        assert!(!subscriber.endpoint().ends_with(":0"));
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = BusSubscriber::open(&BusConfig::bind("tcp://127.0.0.1:0"))
            .await
            .unwrap();

        // Same port twice cannot be bound
        let result = BusSubscriber::open(&BusConfig::bind(first.endpoint())).await;
        match result {
            Err(Error::Bus { endpoint, .. }) => assert_eq!(endpoint, first.endpoint()),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("second bind should fail"),
        }
    }
}
