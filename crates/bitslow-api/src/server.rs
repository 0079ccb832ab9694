use crate::config::ApiConfig;
use crate::routes::build_router;
use crate::state::AppState;
use bitslow_core::ClientId;
use bitslow_db::DatabasePool;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Exchange REST API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiConfig, db_pool: Arc<DatabasePool>) -> Self {
        let state = AppState::new(db_pool, ClientId(config.default_buyer_id));
        Self { config, state }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn run<F>(self, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.address();
        let app = build_router(self.state, &self.config);

        info!(
            address = %addr,
            default_buyer_id = self.config.default_buyer_id,
            debug_endpoints = self.config.debug_endpoints,
            "Starting API server"
        );

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::ApiError::Server(e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::ApiError::Server(e.to_string()))?;

        info!("API server stopped");
        Ok(())
    }
}
