//! Settlers game server.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod server;
mod session;
mod store;

use config::ServerConfig;
use server::ServerState;
use store::{GameStore, JsonFileStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting settlers server...");

    let store: Arc<dyn GameStore> = match &config.store_dir {
        Some(dir) => {
            info!("Storing games in {}", dir.display());
            Arc::new(JsonFileStore::open(dir)?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let state = Arc::new(ServerState::new(store));

    server::run_server(config.addr, state).await
}
