//! Raw bus frames and the feed that carries them to the relay loop

use bytes::Bytes;
use tokio::sync::mpsc;
use zeromq::ZmqMessage;

/// One message received from the bus, before decoding
///
/// Publishers may send a topic part followed by the payload part. Parts are
/// `Bytes`, so cloning a frame only bumps reference counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    parts: Vec<Bytes>,
}

impl RawFrame {
    /// Create a frame from its parts
    pub fn new(parts: Vec<Bytes>) -> Self {
        Self { parts }
    }

    /// Create a single-part frame
    pub fn single(payload: impl Into<Bytes>) -> Self {
        Self {
            parts: vec![payload.into()],
        }
    }

    /// Create a two-part `[topic, payload]` frame
    pub fn with_topic(topic: impl Into<Bytes>, payload: impl Into<Bytes>) -> Self {
        Self {
            parts: vec![topic.into(), payload.into()],
        }
    }

    /// Topic part, present only on multi-part frames
    pub fn topic(&self) -> Option<&Bytes> {
        if self.parts.len() > 1 {
            self.parts.first()
        } else {
            None
        }
    }

    /// Payload part (the last part)
    pub fn payload(&self) -> Option<&Bytes> {
        self.parts.last()
    }

    /// All parts in wire order
    pub fn parts(&self) -> &[Bytes] {
        &self.parts
    }

    /// Total size of all parts in bytes
    pub fn size(&self) -> usize {
        self.parts.iter().map(Bytes::len).sum()
    }
}

impl From<ZmqMessage> for RawFrame {
    fn from(message: ZmqMessage) -> Self {
        Self::new(message.into_vec())
    }
}

/// Producer half of a [`FrameFeed`]
pub type FrameSender = mpsc::Sender<RawFrame>;

/// Sequential, non-restartable feed of raw frames
///
/// The bus socket task owns the sending half; the relay loop consumes this
/// end. Once every sender is gone the feed ends.
#[derive(Debug)]
pub struct FrameFeed {
    rx: mpsc::Receiver<RawFrame>,
}

impl FrameFeed {
    /// Create a bounded feed and its sender
    pub fn channel(capacity: usize) -> (FrameSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }

    /// Wait for the next frame; `None` once the producer is gone
    pub async fn next_frame(&mut self) -> Option<RawFrame> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_part_frame() {
        let frame = RawFrame::single(Bytes::from_static(b"{\"PV\": 1}"));

        assert!(frame.topic().is_none());
        assert_eq!(frame.payload().unwrap().as_ref(), b"{\"PV\": 1}");
        assert_eq!(frame.size(), 9);
    }

    #[test]
    fn test_topic_and_payload() {
        let frame = RawFrame::with_topic("INFO", "{}");

        assert_eq!(frame.topic().unwrap().as_ref(), b"INFO");
        assert_eq!(frame.payload().unwrap().as_ref(), b"{}");
        assert_eq!(frame.parts().len(), 2);
    }

    #[test]
    fn test_empty_frame_has_no_payload() {
        let frame = RawFrame::new(Vec::new());

        assert!(frame.payload().is_none());
        assert_eq!(frame.size(), 0);
    }

    #[test]
    fn test_from_zmq_message() {
        let mut message = ZmqMessage::from("DEBUG".to_string());
        message.push_back(Bytes::from_static(b"{\"SP\": 3}"));

        let frame = RawFrame::from(message);
        assert_eq!(frame.topic().unwrap().as_ref(), b"DEBUG");
        assert_eq!(frame.payload().unwrap().as_ref(), b"{\"SP\": 3}");
    }

    #[tokio::test]
    async fn test_feed_preserves_order_and_ends() {
        let (tx, mut feed) = FrameFeed::channel(4);

        tx.send(RawFrame::single("a")).await.unwrap();
        tx.send(RawFrame::single("b")).await.unwrap();
        drop(tx);

        assert_eq!(feed.next_frame().await, Some(RawFrame::single("a")));
        assert_eq!(feed.next_frame().await, Some(RawFrame::single("b")));
        assert_eq!(feed.next_frame().await, None);
    }
}
