//! Tracing bootstrap for the game server.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

pub fn init_telemetry(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = if cfg.log_json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    tracing_subscriber::registry().with(filter).with(fmt_layer).init();

    tracing::info!(
        target: "telemetry",
        bind_addr = %cfg.bind_addr,
        store = ?cfg.store,
        json_logs = cfg.log_json,
        image_api_key = cfg.image_api_key.is_some(),
        "telemetry initialized"
    );
}
