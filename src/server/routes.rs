//! HTTP routes
//!
//! `/` serves the page, `/vendor` its static assets and `/live` upgrades to
//! the event WebSocket.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::registry::ClientRegistry;
use crate::session::run_client;
use crate::stats::RelayStats;

/// Path of the live event WebSocket
pub const LIVE_PATH: &str = "/live";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ClientRegistry>,
    pub stats: Arc<RelayStats>,
}

/// Build the router
///
/// Needs to be served with connect info (`SocketAddr`) for the live route.
pub fn build_router(state: AppState, asset_dir: &Path) -> Router {
    Router::new()
        .route(LIVE_PATH, get(live_upgrade))
        .route_service("/", ServeFile::new(asset_dir.join("index.html")))
        .nest_service("/vendor", ServeDir::new(asset_dir.join("vendor")))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn live_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(peer_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| run_client(socket, peer_addr, state.registry, state.stats))
}
