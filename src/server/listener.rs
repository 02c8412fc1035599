//! Relay server
//!
//! Wires the bus subscriber, the relay loop, the stats task and the
//! HTTP/WebSocket listener together.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::bus::{BusConfig, BusSubscriber, FrameFeed};
use crate::error::Result;
use crate::registry::{ClientRegistry, RegistryConfig};
use crate::relay::{Dispatcher, Relay};
use crate::server::config::ServerConfig;
use crate::server::routes::{build_router, AppState};
use crate::stats::RelayStats;

/// Telemetry relay server
pub struct RelayServer {
    config: ServerConfig,
    bus: BusConfig,
    registry: Arc<ClientRegistry>,
    stats: Arc<RelayStats>,
}

impl RelayServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig, bus: BusConfig) -> Self {
        Self::with_registry_config(config, bus, RegistryConfig::default())
    }

    /// Create a new server with custom registry configuration
    pub fn with_registry_config(
        config: ServerConfig,
        bus: BusConfig,
        registry_config: RegistryConfig,
    ) -> Self {
        Self {
            config,
            bus,
            registry: Arc::new(ClientRegistry::with_config(registry_config)),
            stats: Arc::new(RelayStats::new()),
        }
    }

    /// Get a reference to the client registry
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the server with graceful shutdown
    ///
    /// The bus endpoint and the listener are both acquired before anything
    /// is served; failing either returns the error.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let subscriber = BusSubscriber::open(&self.bus).await?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;

        let (feed, bus_handle) = subscriber.spawn();
        let result = self.serve(feed, listener, shutdown).await;

        bus_handle.abort();
        result
    }

    /// Serve clients from an already bound listener, relaying `feed`
    pub async fn serve<F>(&self, feed: FrameFeed, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;

        let dispatcher = Dispatcher::with_overflow_log_interval(
            Arc::clone(&self.registry),
            Arc::clone(&self.stats),
            self.config.overflow_log_interval,
        );
        let relay = Relay::with_dispatcher(
            self.config.channels.clone(),
            dispatcher,
            Arc::clone(&self.stats),
        );
        let relay_handle = tokio::spawn(async move { relay.run(feed).await });
        let stats_handle = self.spawn_stats_task();

        let state = AppState {
            registry: Arc::clone(&self.registry),
            stats: Arc::clone(&self.stats),
        };
        let app = build_router(state, &self.config.asset_dir)
            .into_make_service_with_connect_info::<SocketAddr>();

        tracing::info!(
            addr = %addr,
            assets = %self.config.asset_dir.display(),
            "Relay listening"
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        tracing::info!("Shutdown signal received");

        relay_handle.abort();
        stats_handle.abort();
        self.registry.clear().await;

        result.map_err(Into::into)
    }

    fn spawn_stats_task(&self) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let stats = Arc::clone(&self.stats);
        let interval = self.config.stats_interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let clients = registry.client_count().await;
                let snapshot = stats.snapshot();
                tracing::info!(
                    clients = clients,
                    frames_received = snapshot.frames_received,
                    frames_dropped = snapshot.frames_dropped,
                    events_routed = snapshot.events_routed,
                    deliveries = snapshot.deliveries,
                    deliveries_dropped = snapshot.deliveries_dropped,
                    uptime_secs = snapshot.uptime.as_secs(),
                    "Relay stats"
                );
            }
        })
    }
}
