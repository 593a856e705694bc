mod config;
mod errors;
mod generation;
mod layout;
mod models;
mod routes;
mod schedule;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::companion::ScriptGenerators;
use crate::layout::default_log_layout;
use crate::routes::build_router;
use crate::schedule::SystemClock;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting document generator v{}", env!("CARGO_PKG_VERSION"));

    // External certificate / test generators
    let generators = ScriptGenerators::from_config(&config);
    info!(
        "Generators: {} {} | {} (templates: {}, timeout {}s)",
        generators.interpreter,
        generators.certificate_script.display(),
        generators.test_script.display(),
        generators.template_dir.display(),
        generators.timeout.as_secs()
    );
    if !config.script_dir.is_dir() {
        warn!(
            "SCRIPT_DIR {} does not exist; generation requests will fail",
            config.script_dir.display()
        );
    }

    let layout = default_log_layout();
    if layout.table_width() as i64 > layout.text_width() {
        warn!("Training log table is wider than the page text area");
    }
    info!(
        "Training log layout: {}x{} twips, table {} twips, font {}",
        layout.page_width,
        layout.page_height,
        layout.table_width(),
        layout.font
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        clock: Arc::new(SystemClock),
        generators: Arc::new(generators),
        layout: Arc::new(layout),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
