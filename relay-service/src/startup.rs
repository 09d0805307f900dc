//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{index, not_found, relay_events};
use crate::services::{build_http_client, build_provider, PushProvider};
use axum::{middleware::from_fn, routing::any, Router};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub provider: Arc<dyn PushProvider>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(index))
        .route("/api/*token", any(relay_events))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider named in the configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let client = build_http_client(&config.outbound)
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        let provider = build_provider(&config.provider, client).map_err(|e| {
            tracing::error!("Failed to initialize {} provider: {}", config.provider.name(), e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: RelayConfig,
        provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 binds a random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            address = %address,
            port,
            provider = provider.name(),
            "Relay service listening"
        );

        let state = AppState {
            config: Arc::new(config),
            provider,
        };

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
