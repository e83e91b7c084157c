//! # terrad — terrarium control daemon
//!
//! Composition root that wires the controller, the hardware adapters and the
//! HTTP server together.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Load or initialise the persisted settings
//! - Construct the controller aggregate with the hardware adapters
//! - Spawn the control loop
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no control logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use terra_adapter_http_axum::state::AppState;
use terra_adapter_virtual::{VirtualRelayBoard, VirtualSensorBoard};
use terra_app::controller::Terrarium;
use terra_app::{settings, tick};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let paths = config.storage_paths();
    std::fs::create_dir_all(&config.storage.data_dir)
        .with_context(|| format!("creating {}", config.storage.data_dir.display()))?;

    let loaded = settings::load_or_init(&paths.settings).context("loading settings")?;

    let now = chrono::Local::now().naive_local();
    let mut terrarium = Terrarium::new(
        loaded,
        paths,
        config.storage.max_trace_days,
        VirtualRelayBoard::new(),
        VirtualSensorBoard::new(),
        now,
    )
    .context("building the controller")?;
    terrarium.bootstrap().context("starting the controller")?;

    let shared = Arc::new(Mutex::new(terrarium));
    tokio::spawn(tick::run(
        Arc::clone(&shared),
        Duration::from_millis(config.tick.poll_interval_ms),
    ));

    let app = terra_adapter_http_axum::router::build(AppState::new(shared));

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "terrad listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
