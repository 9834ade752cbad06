use anyhow::Context;
use chrono::Local;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use duty_roster::api::build_router;
use duty_roster::app_state::AppState;
use duty_roster::config::Config;
use duty_roster::db::sqlite::SqliteStore;
use duty_roster::db::store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let _log_guard = init_tracing(&config)?;

    info!("🛢️ Opening record store at {}", config.database_url);
    let store = Arc::new(
        SqliteStore::open(&config.database_url)
            .await
            .context("Failed to open the record store")?,
    );

    if config.seed_sample_data && store.seed_sample_data(Local::now().date_naive()).await? {
        info!("🌱 Empty store, loaded sample data");
    }

    let shared: Arc<dyn RecordStore> = store.clone();
    let app = build_router(AppState::new(shared, config.clone()));

    run_server(app, config.server_addr, store).await?;
    info!("Shutdown complete.");
    Ok(())
}

/// Console plus a daily rolling file in `log_dir`. `RUST_LOG` overrides the
/// default `info` level.
fn init_tracing(config: &Config) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "duty-roster.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

async fn run_server(app: axum::Router, addr: SocketAddr, store: Arc<SqliteStore>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🚀 Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(store))
        .await
        .context("Server encountered an error")
}

async fn shutdown_signal(store: Arc<SqliteStore>) {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => error!("❌ Failed to listen for Ctrl+C: {}", e),
    }
    info!("🛠️ Closing database pool...");
    store.close().await;
    info!("✅ Database pool closed.");
}
