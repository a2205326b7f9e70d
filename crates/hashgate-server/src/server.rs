use std::sync::Arc;
use std::time::Duration;

use hashgate_crypto::ContentHasher;
use hashgate_store::{ContentStore, ObjectStore, S3ObjectStore};
use tokio::net::TcpListener;

use crate::auth::AccessGate;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, with_limits};
use crate::state::AppState;

/// hashgate HTTP server.
pub struct HashgateServer {
    config: ServerConfig,
    state: AppState,
}

impl HashgateServer {
    /// Wire a server around `backend`. Fails fast on an unusable config.
    pub fn new(config: ServerConfig, backend: Arc<dyn ObjectStore>) -> ServerResult<Self> {
        config.validate()?;
        let content = ContentStore::new(backend, config.bucket.clone())
            .with_hasher(ContentHasher::new(config.algorithm))
            .with_content_type(config.content_type.clone());
        let gate = AccessGate::new(config.secret_key.as_str());
        Ok(Self {
            state: AppState::new(content, gate),
            config,
        })
    }

    /// Wire a server around the S3-compatible service named in `config`.
    pub async fn connect(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let backend = S3ObjectStore::connect(&config.s3).await;
        Self::new(config, Arc::new(backend))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        with_limits(
            build_router(self.state.clone()),
            self.config.max_concurrent_requests,
            Duration::from_secs(self.config.request_timeout_secs),
        )
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            bucket = %self.config.bucket,
            "hashgate listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
