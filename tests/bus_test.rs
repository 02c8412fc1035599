//! Bus round trips over loopback TCP
//!
//! PUB/SUB drops whatever is published before the subscription reaches the
//! publisher, so each test keeps publishing until the first frame lands.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use tokio_test::assert_ok;

use telemetry_relay::bus::{BusConfig, BusSubscriber, FrameFeed, RawFrame, TelemetryPublisher};
use telemetry_relay::{decode, ChannelTable, ClientRegistry, Record, Relay, RelayStats};

const WAIT: Duration = Duration::from_secs(10);

async fn first_frame(publisher: &mut TelemetryPublisher, feed: &mut FrameFeed, record: &Record) -> RawFrame {
    timeout(WAIT, async {
        loop {
            assert_ok!(publisher.publish("DEBUG", record).await);
            tokio::select! {
                frame = feed.next_frame() => return frame.expect("feed ended"),
                _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            }
        }
    })
    .await
    .expect("no frame crossed the bus")
}

#[tokio::test]
async fn test_subscriber_binds_publisher_connects() {
    let subscriber = BusSubscriber::open(&BusConfig::bind("tcp://127.0.0.1:0"))
        .await
        .unwrap();
    let endpoint = subscriber.endpoint().to_string();
    let (mut feed, handle) = subscriber.spawn();

    let mut publisher = TelemetryPublisher::open(&BusConfig::connect(endpoint))
        .await
        .unwrap();

    let record = Record::new().with_float("PV", 12.5);
    let frame = first_frame(&mut publisher, &mut feed, &record).await;

    assert_eq!(frame.topic().unwrap().as_ref(), b"DEBUG");
    assert_eq!(decode(&frame).unwrap(), record);

    handle.abort();
}

#[tokio::test]
async fn test_subscriber_connects_to_bound_publisher() {
    let mut publisher = TelemetryPublisher::open(&BusConfig::bind("tcp://127.0.0.1:0"))
        .await
        .unwrap();
    let endpoint = publisher.endpoint().to_string();

    let subscriber = BusSubscriber::open(&BusConfig::connect(endpoint))
        .await
        .unwrap();
    let (mut feed, handle) = subscriber.spawn();

    let record = Record::new().with("MV", 2).with("SP", 3);
    let frame = first_frame(&mut publisher, &mut feed, &record).await;

    assert_eq!(decode(&frame).unwrap(), record);

    handle.abort();
}

#[tokio::test]
async fn test_bus_to_client_queue() {
    let subscriber = BusSubscriber::open(&BusConfig::bind("tcp://127.0.0.1:0"))
        .await
        .unwrap();
    let endpoint = subscriber.endpoint().to_string();
    let (mut feed, handle) = subscriber.spawn();

    let mut publisher = TelemetryPublisher::open(&BusConfig::connect(endpoint))
        .await
        .unwrap();

    // Establish the subscription before the relay takes over the feed
    let warmup = Record::new().with("warmup", 1);
    first_frame(&mut publisher, &mut feed, &warmup).await;

    let registry = Arc::new(ClientRegistry::new());
    let mut client = registry.register(None).await;
    let relay = Relay::new(ChannelTable::default(), Arc::clone(&registry), Arc::new(RelayStats::new()));
    let relay_handle = tokio::spawn(async move { relay.run(feed).await });

    assert_ok!(
        publisher
            .publish_raw("INFO", bytes::Bytes::from_static(b"not json at all"))
            .await
    );
    assert_ok!(
        publisher
            .publish("DEBUG", &Record::new().with("PV", 1).with("MV", 2).with("SP", 3))
            .await
    );

    let mut received = Vec::new();
    while received.len() < 3 {
        let message = timeout(WAIT, client.rx.recv())
            .await
            .expect("no event reached the client")
            .expect("client queue closed");
        received.push(serde_json::from_str::<serde_json::Value>(message.text()).unwrap());
    }

    assert_eq!(
        received,
        vec![
            json!({"event": "pvdata", "data": {"y": 1}}),
            json!({"event": "mvdata", "data": {"y": 2}}),
            json!({"event": "spdata", "data": {"y": 3}}),
        ]
    );

    relay_handle.abort();
    handle.abort();
}
