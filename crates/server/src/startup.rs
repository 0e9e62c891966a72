use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig, StorageBackend};
use migration::MigratorTrait;
use service::customer::{
    repo::seaorm::SeaOrmCustomerRepository,
    repository::memory::MemoryCustomerRepository,
    CustomerRepository,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve the socket address from `[server]`
pub fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}:{}: {e}", server.host, server.port)))
}

/// Pick the customer store from `[storage]`, connecting and migrating Postgres when selected.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let repo: Arc<dyn CustomerRepository> = match cfg.storage.backend {
        StorageBackend::Memory => {
            warn!(backend = "memory", "customers are kept in process memory and lost on restart");
            Arc::new(MemoryCustomerRepository::new())
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Database(format!("migrate up: {e}")))?;
                info!(event = "migrated", "database schema up to date");
            }
            Arc::new(SeaOrmCustomerRepository::new(db))
        }
    };
    Ok(ServerState::new(repo))
}

/// Build the router for a ready state
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves once Ctrl+C is received
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; shutdown only on process kill");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Serve the customer API for an already-loaded config until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = bind_addr(&cfg.server)?;
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "customer api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "stopped", "customer api stopped");
    Ok(())
}
