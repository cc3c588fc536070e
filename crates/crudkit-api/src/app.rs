//! Application builder: wires stores, state, and router into a running server.

use std::sync::Arc;

use axum::Router;

use crudkit_core::config::{AppConfig, StoreBackend};
use crudkit_core::error::AppError;
use crudkit_database::{DatabasePool, EntityStore, MemoryStore, PgStore, migration};
use crudkit_entity::{Pokemon, Trainer, fixtures};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Build application state over the configured backend.
///
/// The memory backend is seeded with the fixture rows. The postgres backend
/// connects and optionally migrates first.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store with fixture data");
            let pokemon: Arc<dyn EntityStore<Pokemon>> =
                Arc::new(MemoryStore::seeded(fixtures::pokemon()));
            let trainers: Arc<dyn EntityStore<Trainer>> =
                Arc::new(MemoryStore::seeded(fixtures::trainers()));
            Ok(AppState::new(config, pokemon, trainers))
        }
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                migration::run_migrations(db.pool()).await?;
                tracing::info!("Database migrations complete");
            }

            let pokemon: Arc<dyn EntityStore<Pokemon>> = Arc::new(PgStore::new(db.pool().clone()));
            let trainers: Arc<dyn EntityStore<Trainer>> =
                Arc::new(PgStore::new(db.pool().clone()));
            Ok(AppState::new(config, pokemon, trainers).with_database(db))
        }
    }
}

/// Runs the CrudKit server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CrudKit v{}", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config).await?;
    let db = state.db.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("CrudKit server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(db) = db {
        db.close().await;
    }

    tracing::info!("CrudKit server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
