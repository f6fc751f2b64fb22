//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use rates_types::RatesRepository;

use super::handlers::{self, AppState};
use crate::RatesService;

/// HTTP Server for the rates API.
pub struct HttpServer<R: RatesRepository> {
    state: Arc<AppState<R>>,
}

impl<R: RatesRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: RatesService<R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::PUT,
                Method::HEAD,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
            .max_age(Duration::from_secs(86400));

        Router::new()
            .route("/healthz", get(handlers::health))
            .route(
                "/v1/currencies",
                get(handlers::list_currencies::<R>).post(handlers::create_currency::<R>),
            )
            .route(
                "/v1/currencies/{id}",
                get(handlers::get_currency::<R>).patch(handlers::update_currency::<R>),
            )
            .route(
                "/v1/conversions",
                get(handlers::list_conversions::<R>).post(handlers::create_conversion::<R>),
            )
            .route(
                "/v1/conversions/{id}",
                get(handlers::get_conversion::<R>).patch(handlers::update_conversion::<R>),
            )
            .route(
                "/v1/convert-currencies",
                post(handlers::convert_currencies::<R>),
            )
            .fallback(handlers::path_not_found)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
