//! Serve command implementation
//!
//! Builds the document store and the router, then serves HTTP until the
//! shutdown token is cancelled. In-flight requests are given the database
//! timeout to finish before their store operations are cancelled; the
//! store is disconnected last.

use crate::adapters::database::{create_document_store, DocumentService, OperationContext};
use crate::api::{router, AppState};
use crate::config::{AmbulanceConfig, Environment};
use crate::domain::{Ambulance, AmbulanceError, Result};
use axum::Router;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        mut config: AmbulanceConfig,
        shutdown: CancellationToken,
    ) -> anyhow::Result<i32> {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        tracing::info!(
            environment = ?config.environment,
            target = ?config.database.target,
            database = %config.database.display_location(),
            "Starting ambulance waiting list service"
        );

        let store = create_document_store::<Ambulance>(&config.database);
        let bind_address = config.server.bind_address();
        let listener = match bind_listener(&bind_address).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(address = %bind_address, error = %e, "Failed to bind");
                eprintln!("Error: {e}");
                return Ok(5);
            }
        };

        let requests = CancellationToken::new();
        let app = build_app(&config, Arc::clone(&store), requests.clone());

        tracing::info!(address = %bind_address, "Listening");
        serve_until(
            listener,
            app,
            shutdown,
            requests,
            config.database.timeout(),
        )
        .await
        .map_err(|e| AmbulanceError::Server(format!("HTTP server failed: {e}")))?;

        let ctx = OperationContext::new().with_timeout(config.database.timeout());
        if let Err(e) = store.disconnect(&ctx).await {
            tracing::warn!(error = %e, "Failed to disconnect document store");
        }

        tracing::info!("Service stopped");
        Ok(0)
    }
}

/// Binds the HTTP listener
///
/// # Errors
///
/// Returns [`AmbulanceError::Server`] if the address cannot be bound.
pub async fn bind_listener(address: &str) -> Result<TcpListener> {
    TcpListener::bind(address)
        .await
        .map_err(|e| AmbulanceError::Server(format!("Failed to bind {address}: {e}")))
}

/// The router with the environment-dependent layers applied
///
/// Requests' store operations are cancelled through `requests`.
pub fn build_app(
    config: &AmbulanceConfig,
    store: Arc<dyn DocumentService<Ambulance>>,
    requests: CancellationToken,
) -> Router {
    let app = router(AppState::with_shutdown(store, requests));

    if config.environment == Environment::Production {
        app
    } else {
        app.layer(CorsLayer::permissive())
    }
}

/// Serves `app` until `shutdown` is cancelled and open connections drain
///
/// Once shutdown starts, requests still running after `grace` have their
/// store operations cancelled through `requests`.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    requests: CancellationToken,
    grace: Duration,
) -> std::io::Result<()> {
    let drain = requests.clone();
    let signal = async move {
        shutdown.cancelled().await;
        tracing::info!("Shutdown requested, draining in-flight requests");
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if !drain.is_cancelled() {
                tracing::warn!("Grace period elapsed, cancelling remaining store operations");
                drain.cancel();
            }
        });
    };

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await;
    requests.cancel();
    result
}
