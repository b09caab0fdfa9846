//! Sitelink chat server binary.

use tracing_subscriber::EnvFilter;

use sitelink::backend::server::config::ServerConfig;
use sitelink::backend::server::init::{build_router, build_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = build_state();
    let app = build_router(state);

    let addr = config.socket_addr();
    tracing::info!("[Server] Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
