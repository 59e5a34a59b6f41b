//! Sports Odds Aggregator API Server
//!
//! HTTP API server that serves sports listings, live odds and match pages
//! assembled from the upstream sports odds provider.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use sports_provider::ProviderClient;
use sports_services::{InMemoryCache, SportsService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_PORT: u16 = 3001;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sports: Arc<SportsService>,
    pub cache: Arc<InMemoryCache>,
}

impl AppState {
    pub fn new(sports: SportsService, cache: Arc<InMemoryCache>) -> Self {
        Self {
            sports: Arc::new(sports),
            cache,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sports_api=debug,tower_http=debug")),
        )
        .init();

    info!("Starting Sports Odds Aggregator API");

    let client = ProviderClient::from_env()?;
    info!("Using sports provider at {}", client.base_url());

    let cache = Arc::new(InMemoryCache::new());
    let sports = SportsService::new(Arc::new(client), cache.clone());
    let state = AppState::new(sports, cache);

    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
