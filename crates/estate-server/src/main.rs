//! Estate Server - REST backend for estates, trees and drone patrol plans

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estate_server::config::Config;
use estate_server::state::AppState;
use estate_server::{api, persistence};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("estate_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting Estate Server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Patrol clearance {}, plot distance {}, tree heights {}..={}",
        config.patrol.monitor_clearance,
        config.patrol.plot_distance,
        config.rules.min_tree_height,
        config.rules.max_tree_height
    );

    let db =
        persistence::init_database(&config.database_path, config.database_max_connections).await?;
    let state = Arc::new(AppState::new(db, config));

    let app = api::routes()
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
