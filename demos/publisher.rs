//! Simulated process publisher
//!
//! Publishes PV/MV/SP telemetry from a toy heating loop so the relay has
//! something to forward.
//!
//! Run with: cargo run --example publisher [ENDPOINT]
//!
//! Examples:
//!   cargo run --example publisher                          # connects to ipc:///tmp/relaylog
//!   cargo run --example publisher '>tcp://127.0.0.1:2001'  # connects to a relay bound on TCP
//!   cargo run --example publisher '@tcp://0.0.0.0:2001'    # binds; start the relay with '>'
//!
//! Start the relay first (`cargo run`), then open http://localhost:8080/.

use std::time::Duration;

use bytes::Bytes;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use telemetry_relay::bus::{BusConfig, BusPosture, TelemetryPublisher, DEFAULT_ENDPOINT};

/// Toy plant: a heater driving a temperature toward a setpoint
struct Plant {
    pv: f64,
    sp: f64,
    tick: u64,
}

impl Plant {
    fn new() -> Self {
        Self {
            pv: 20.0,
            sp: 40.0,
            tick: 0,
        }
    }

    /// Advance one step; returns the manipulated value applied
    fn step(&mut self) -> f64 {
        self.tick += 1;

        // Setpoint steps every 30 seconds
        if self.tick % 300 == 0 {
            self.sp = if self.sp > 30.0 { 25.0 } else { 40.0 };
        }

        let err = self.sp - self.pv;
        let mv = (err * 0.8).clamp(-10.0, 10.0);
        let ambient = (20.0 - self.pv) * 0.02;
        let noise = ((self.tick as f64) * 0.7).sin() * 0.1;
        self.pv += mv * 0.05 + ambient + noise;
        mv
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The relay binds by default, so the publisher connects by default
    let config = match std::env::args().nth(1) {
        Some(arg) if arg.starts_with('@') || arg.starts_with('>') => arg.parse::<BusConfig>()?,
        Some(arg) => BusConfig::connect(arg),
        None => BusConfig::connect(DEFAULT_ENDPOINT),
    };
    if config.posture == BusPosture::Bind {
        println!("Binding {}; start the relay with '>{}'", config.endpoint, config.endpoint);
    }

    let mut publisher = TelemetryPublisher::open(&config).await?;
    let mut plant = Plant::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    println!("Publishing on {} (Ctrl+C to stop)", publisher.endpoint());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mv = plant.step();
                let record = json!({
                    "msg": "got metric value",
                    "levelname": "DEBUG",
                    "PV": plant.pv,
                    "MV": mv,
                    "SP": plant.sp,
                });
                publisher
                    .publish_raw("DEBUG", Bytes::from(record.to_string()))
                    .await?;
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopped after {} samples", plant.tick);
                return Ok(());
            }
        }
    }
}
