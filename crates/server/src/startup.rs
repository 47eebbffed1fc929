use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{
    products::{ProductRepository, ProductStore},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router over an already constructed product repository.
pub fn build_app(products: Arc<dyn ProductRepository>) -> Router {
    routes::build_router(AppState::new(products), build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by process exit");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app from `cfg` and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let data_file = cfg.storage.data_file.clone();
    runtime::ensure_data_dir(&data_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let store: Arc<dyn ProductRepository> = ProductStore::new(&data_file);
    let app = build_app(store);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    info!(
        addr = %listener.local_addr()?,
        data_file = %data_file.display(),
        debug = cfg.server.debug,
        "product server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
