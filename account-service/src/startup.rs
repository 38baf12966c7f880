//! Application startup and lifecycle management.

use crate::build_router;
use crate::config::{AccountConfig, StoreBackend};
use crate::services::{AccountService, AccountStore, InMemoryAccountStore, MongoAccountStore};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AccountConfig,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(config: AccountConfig, store: Arc<dyn AccountStore>) -> Self {
        Self {
            config,
            accounts: AccountService::new(store),
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    mongo: Option<MongoAccountStore>,
}

impl Application {
    /// Connect the configured store and bind the listener.
    pub async fn build(config: AccountConfig) -> Result<Self, AppError> {
        let (store, mongo): (Arc<dyn AccountStore>, Option<MongoAccountStore>) = match config.store
        {
            StoreBackend::Mongodb => {
                let db = MongoAccountStore::connect(
                    &config.mongodb.uri,
                    &config.mongodb.database,
                    &config.mongodb.collection,
                )
                .await?;

                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;

                (Arc::new(db.clone()), Some(db))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory account store; data is lost on exit");
                (Arc::new(InMemoryAccountStore::new()), None)
            }
        };

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Account service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, store),
            mongo,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM, then close the store connection.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(mongo) = self.mongo {
            mongo.close().await;
        }

        result.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
