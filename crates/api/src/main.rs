use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use roofquote_core::store::{MemoryQuoteStore, QuoteStore};
use roofquote_db::PgQuoteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roofquote_api::config::{LogFormat, ServerConfig, StoreBackend};
use roofquote_api::router::build_app_router;
use roofquote_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = ?config.environment,
        store = ?config.store_backend,
        "Loaded server configuration",
    );

    // --- Store ---
    let store = init_store(&config).await?;

    // --- App state ---
    let state = AppState::new(Arc::clone(&store), config.clone());

    // --- Router ---
    let app = build_app_router(state)?;

    // --- Start server ---
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid HOST address '{}'", config.host))?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    store.close().await;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "roofquote_api=debug,roofquote_core=debug,roofquote_db=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Build the configured store. The Postgres backend is health-checked and
/// migrated before the server accepts traffic.
async fn init_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn QuoteStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory quote store; data is lost on restart");
            Ok(Arc::new(MemoryQuoteStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;

            let pool = roofquote_db::create_pool(database_url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            roofquote_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            roofquote_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgQuoteStore::new(pool)))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
