mod app;
mod config;
mod loader;
mod routes;
mod state;

use choropleth_shared::MapConfig;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let static_dir = config::static_dir();
    let data_dir = config::data_dir();
    let topology_path = data_dir.join(config::topology_file());
    let table_path = data_dir.join(config::table_file());
    tracing::info!(
        static_dir = %static_dir.display(),
        topology = %topology_path.display(),
        table = %table_path.display(),
        "loading map data"
    );

    let map_config = MapConfig::default();
    let loaded = loader::load_map(&map_config, &topology_path, &table_path).await;
    if let Err(e) = &loaded {
        tracing::error!(error = %e, "map data failed to load; serving static files only");
    }
    let state = AppState::new(static_dir, data_dir).with_load_result(loaded);

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Choropleth server listening on {addr}");

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
