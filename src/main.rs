use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;

use blog_cms::config::Settings;
use blog_cms::postgres::PostgresPool;
use blog_cms::server::{create_app, AppState};
use blog_cms::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Initialize tracing; the guard flushes spans on exit
    let _telemetry = init_telemetry(&settings.log, &settings.otel)?;
    tracing::info!(storage = %settings.storage.backend, "Configuration loaded");

    let postgres_pool = connect_postgres(&settings).await?;

    // Create application state
    let state = AppState::new(settings.clone(), postgres_pool.clone());
    tracing::info!(
        posts_backend = state.posts.backend_type(),
        subscribers_backend = state.subscribers.backend_type(),
        "Application state initialized"
    );

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Open the PostgreSQL pool when the postgres storage backend is selected.
async fn connect_postgres(settings: &Settings) -> Result<Option<Arc<PostgresPool>>> {
    if !settings.uses_postgres() {
        return Ok(None);
    }

    let pool = PostgresPool::new(&settings.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if settings.database.run_migrations {
        pool.run_migrations()
            .await
            .context("Failed to run PostgreSQL migrations")?;
    }

    Ok(Some(Arc::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
