use crate::config::VaultConfig;
use crate::handlers;
use crate::services::{DocumentRepository, LocalStorage, MongoDb, ProfileRepository, Storage};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Room for multipart boundaries and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: VaultConfig,
    pub documents: Arc<dyn DocumentRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub storage: Arc<dyn Storage>,
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .storage
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);
    let uploads = ServeDir::new(&state.config.storage.local_path);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/upload", post(handlers::upload_document))
        .route("/documents", get(handlers::list_documents))
        .route(
            "/documents/:id",
            get(handlers::get_document_file)
                .put(handlers::update_document)
                .delete(handlers::delete_document),
        )
        .route(
            "/profile",
            get(handlers::get_profile).post(handlers::update_profile),
        )
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    db: MongoDb,
}

impl Application {
    pub async fn build(config: VaultConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );

        let state = AppState {
            config: config.clone(),
            documents: Arc::new(db.clone()),
            profiles: Arc::new(db.clone()),
            storage,
        };

        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
            db,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
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
