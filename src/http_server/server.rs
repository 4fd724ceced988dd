//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers under `/api/v1`.

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::bootcamp_routes::bootcamp_routes;
use super::config::AppConfig;
use super::course_routes::course_routes;
use super::health_routes::health_routes;
use super::state::AppState;

/// Prefix every resource route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Allowance for multipart framing on top of the photo itself
const BODY_OVERHEAD: usize = 64 * 1024;

/// HTTP server for the bootcamp API
pub struct HttpServer {
    config: AppConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over prepared state
    pub fn new(config: AppConfig, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.server.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until ctrl-c or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            environment = %self.config.environment,
            uploads = %self.config.file_upload_path.display(),
            "bootcamp API listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    // Configure CORS from config
    let cors = if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let body_limit = usize::try_from(config.max_file_upload)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_OVERHEAD);

    let router = Router::new()
        .merge(health_routes::<AppState>())
        .nest(&format!("{API_PREFIX}/bootcamps"), bootcamp_routes())
        .nest(&format!("{API_PREFIX}/courses"), course_routes())
        .nest_service("/uploads", ServeDir::new(&config.file_upload_path))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state);

    // Request logging in development only
    if config.is_development() {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
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
