use crate::config::{ArticleConfig, StoreBackend};
use crate::handlers;
use crate::services::{ArticleStore, InMemoryArticleStore, MongoArticleStore};
use axum::{
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    http_trace_layer, json_content_type_middleware, request_id_middleware,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::welcome).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/ready",
            get(handlers::readiness_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/articulos",
            get(handlers::list_articles)
                .post(handlers::create_article)
                .fallback(handlers::method_not_allowed),
        )
        // Only PATCH is defined here; a GET must still reach the not-found reply.
        .route(
            "/articulos/:codigo",
            get(handlers::not_found)
                .patch(handlers::update_price)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/articulo/:codigo",
            get(handlers::get_article)
                .delete(handlers::delete_article)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/articulos/nombre/:nombre",
            get(handlers::search_by_nombre).fallback(handlers::method_not_allowed),
        )
        .route(
            "/articulos/categoria/:categoria",
            get(handlers::search_by_categoria).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(from_fn(json_content_type_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(config: ArticleConfig) -> Result<Self, AppError> {
        let store: Arc<dyn ArticleStore> = match config.store {
            StoreBackend::Mongodb => Arc::new(
                MongoArticleStore::new(
                    &config.mongodb.uri,
                    &config.mongodb.database,
                    &config.mongodb.collection,
                )
                .await?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory article store; data is lost on shutdown");
                Arc::new(InMemoryArticleStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Binds the listener around an already constructed store.
    pub async fn build_with_store(
        config: ArticleConfig,
        store: Arc<dyn ArticleStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn ArticleStore> {
        self.state.store.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests and
    /// tears the store down.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let store = self.state.store.clone();
        let app = build_router(self.state);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        store.shutdown().await;

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }
        result
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
