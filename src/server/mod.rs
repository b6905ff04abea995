//! HTTP front end for the verification pipeline.

pub mod config;
mod handlers;

pub use config::{ConfigError, ConfigFile, ServerConfig};
pub use handlers::{ChecksResponse, ErrorResponse, ScoreResponse, ValidateRequest};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware::map_response,
    response::Response,
    routing::{get, post},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::dns::DnsError;
use crate::verify::Verifier;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build DNS resolver: {source}")]
    Resolver {
        #[source]
        source: DnsError,
    },
    #[error("HTTP server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

/// Routes of the API. CORS is permissive; every request is capped by
/// `request_timeout` and a request that hits the cap gets the
/// `Server Error` verdict.
pub fn router(verifier: Arc<Verifier>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/validate-email", post(handlers::validate_email))
        .route("/api/validate-email/checks", post(handlers::validate_email_checks))
        .route("/api/validate-email/score", post(handlers::validate_email_score))
        .route("/health", get(handlers::health))
        .with_state(verifier)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(timeout_as_verdict))
        .layer(CorsLayer::permissive())
}

// no handler answers 408, so it can only come from the timeout layer
async fn timeout_as_verdict(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("request hit the timeout");
        handlers::server_error()
    } else {
        response
    }
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<S>(
    listener: TcpListener,
    router: Router,
    shutdown: S,
) -> Result<(), ServerError>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| ServerError::Serve { source })
}

/// Builds the verifier, binds `config.listen` and serves until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let verifier = Verifier::from_options(config.verify.clone())
        .map_err(|source| ServerError::Resolver { source })?;
    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| ServerError::Bind {
            address: config.listen.to_string(),
            source,
        })?;

    tracing::info!(
        address = %config.listen,
        helo = %config.verify.probe.helo_name(),
        dnsbl = %config.verify.reputation.zone,
        "mailverify server listening"
    );

    let app = router(Arc::new(verifier), config.request_timeout);
    serve(listener, app, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    })
    .await?;

    tracing::info!("mailverify server stopped");
    Ok(())
}

#[cfg(test)]
mod tests;
