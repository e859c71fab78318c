use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::finder::PubFinder;
use crate::{api, pages};

/// Shared by every handler; the finder itself is immutable
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<PubFinder>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(finder: PubFinder, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            finder: Arc::new(finder),
            static_dir: static_dir.into(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(pages::router())
        .nest("/api", api::router())
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}:{}", host, port);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
