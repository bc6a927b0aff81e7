mod app;
mod config;
mod dataset;
mod routes;
mod state;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let state = AppState::from_env();
    tracing::info!(
        public_dir = %state.public_dir.display(),
        index_page = %state.index_page.display(),
        "Serving campus map assets"
    );

    // A bad dataset only degrades the map; keep serving
    match dataset::validate(&state.public_dir).await {
        Ok(summary) => {
            tracing::info!(buildings = summary.buildings, "Building dataset loaded");
            if summary.unnamed > 0 {
                tracing::warn!(count = summary.unnamed, "buildings without an asset id");
            }
            if !summary.missing_overlays.is_empty() {
                tracing::warn!(
                    count = summary.missing_overlays.len(),
                    ids = %summary.missing_overlays.join(", "),
                    "buildings without an overlay SVG will not appear on the map"
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "building dataset failed validation"),
    }

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Campus map server listening on http://{addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
