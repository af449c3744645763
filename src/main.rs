use std::sync::Arc;

use anyhow::Context;
use robo_city::config::{Config, StoreBackend};
use robo_city::db::connect_to_mysql;
use robo_city::services::image::FallbackChain;
use robo_city::store::{MemoryStore, MySqlStore, Store};
use robo_city::telemetry::init_telemetry;
use robo_city::{app, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_telemetry(&config);

    let store: Arc<dyn Store> = match config.store {
        StoreBackend::MySql => {
            let pool = connect_to_mysql(&config)
                .await
                .context("Failed to connect to MySQL")?;
            tracing::info!("Successfully connected to MySQL!");
            Arc::new(MySqlStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, all data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let images = Arc::new(FallbackChain::from_config(&config).context("image providers")?);

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, store, images);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("could not bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "robo city server listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
