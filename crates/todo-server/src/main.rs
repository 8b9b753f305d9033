//! Todo Server
//!
//! A single-resource HTTP API persisting todo items in a relational table.
//! Every method on `/todo` maps to one SQL statement.

mod error;
mod handlers;
mod settings;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::settings::Settings;
use storage::TodoStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
    install_panic_hook();

    info!("Starting Todo Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}, max_connections={}",
        settings.bind_address,
        settings.database_scheme(),
        settings.max_connections
    );

    let store = storage::connect(&settings.database_url, settings.max_connections)
        .context("Failed to open database")?;
    store.ping().await.context("Failed to reach database")?;
    info!("Connected to DB!");

    let state = AppState {
        store: store.clone(),
    };
    let app = handlers::router(state);

    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server running at http://{}{}", addr, handlers::TODO_PATH);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    store.close().await;
    info!("Database connection closed");

    served
}

/// Sends panics through tracing before the default hook prints them.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");

        match info.location() {
            Some(at) => error!(file = at.file(), line = at.line(), "panic: {}", message),
            None => error!("panic: {}", message),
        }
        default_hook(info);
    }));
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
