//! Server lifecycle for the lead distributor.
//!
//! [`DistributionServerBuilder`] wires configuration, the SQLite store and
//! the distribution engine together; [`DistributionServer`] owns the HTTP
//! surface and its startup/shutdown. Tests run the router in-process via
//! [`DistributionServer::router`] without binding a socket.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{self, ApiState};
use crate::config::DistributorConfig;
use crate::database::Database;
use crate::distributor::DistributionEngine;
use crate::error::{DistributionError, Result};

/// Builder for [`DistributionServer`]
pub struct DistributionServerBuilder {
    config: DistributorConfig,
}

impl DistributionServerBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self {
            config: DistributorConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: DistributorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a file-backed database at the given path
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.config.database.database_path = path.into();
        self
    }

    /// Use an in-memory database (testing and demos)
    pub fn with_in_memory_database(mut self) -> Self {
        self.config.database.database_path = String::new();
        self
    }

    /// Validate the configuration, open the store and assemble the server
    pub async fn build(self) -> Result<DistributionServer> {
        self.config.validate().map_err(DistributionError::config)?;

        let database = Database::connect(&self.config.database).await?;
        let config = Arc::new(self.config);
        let engine = Arc::new(DistributionEngine::new(
            config.distribution.clone(),
            database.clone(),
        ));

        Ok(DistributionServer {
            config,
            database,
            engine,
            shutdown: None,
            handle: None,
        })
    }
}

impl Default for DistributionServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The lead distribution server
pub struct DistributionServer {
    config: Arc<DistributorConfig>,
    database: Database,
    engine: Arc<DistributionEngine>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl DistributionServer {
    /// The server configuration
    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    /// The underlying store
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The distribution engine
    pub fn engine(&self) -> Arc<DistributionEngine> {
        self.engine.clone()
    }

    /// The HTTP router, with request tracing and CORS applied
    pub fn router(&self) -> Router {
        api::router(ApiState::new(self.engine.clone(), self.config.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Bind the listen address and serve in the background.
    ///
    /// Returns once the socket is bound; use [`stop`](Self::stop) to shut
    /// down gracefully.
    pub async fn start(&mut self) -> Result<()> {
        let listener = TcpListener::bind(self.config.general.bind_addr)
            .await
            .map_err(|e| DistributionError::internal(format!("bind failed: {}", e)))?;

        let addr = listener
            .local_addr()
            .map_err(|e| DistributionError::internal(format!("local_addr failed: {}", e)))?;
        info!("🚀 {} listening on {}", self.config.general.service_name, addr);

        let (tx, rx) = oneshot::channel::<()>();
        let router = self.router();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
        });

        self.shutdown = Some(tx);
        self.handle = Some(handle);
        Ok(())
    }

    /// Shut the server down gracefully
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .map_err(|e| DistributionError::internal(format!("server task panicked: {}", e)))?
                .map_err(|e| DistributionError::internal(format!("server error: {}", e)))?;
        }

        info!("🛑 {} stopped", self.config.general.service_name);
        Ok(())
    }

    /// Serve in the foreground until interrupted (SIGINT)
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.general.bind_addr)
            .await
            .map_err(|e| DistributionError::internal(format!("bind failed: {}", e)))?;

        let addr = listener
            .local_addr()
            .map_err(|e| DistributionError::internal(format!("local_addr failed: {}", e)))?;
        info!("🚀 {} listening on {}", self.config.general.service_name, addr);

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
                info!("🛑 Shutdown signal received");
            })
            .await
            .map_err(|e| DistributionError::internal(format!("server error: {}", e)))?;

        Ok(())
    }
}
