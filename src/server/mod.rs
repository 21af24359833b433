// src/server/mod.rs
// =============================================================================
// HTTP API for the validator.
//
// Endpoints:
// - GET /check?url=...&limit=... : validate an llms.txt, returns ValidationResult JSON
// - GET /openapi.json            : OpenAPI description of /check
// - GET /                        : redirects to /openapi.json
//
// A document that fails validation is still a 200: only malformed requests
// to the API itself get a 4xx.
// =============================================================================

mod handlers;
mod openapi;

use anyhow::Context;
use axum::routing::get;
use axum::Router;

use crate::validator::Validator;
use handlers::{check_handler, not_found, openapi_handler, root_handler};

/// Builds the router; the validator is shared by every request
pub fn router(validator: Validator) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/check", get(check_handler))
        .route("/openapi.json", get(openapi_handler))
        .fallback(not_found)
        .with_state(validator)
}

/// Binds `host:port` and serves until the process is stopped
pub async fn start_server(host: &str, port: u16, validator: Validator) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind API server to {}:{}", host, port))?;

    log::info!("API server listening on http://{}:{}/", host, port);
    log::info!("  - Check: http://{}:{}/check?url=https://example.com/llms.txt", host, port);
    log::info!("  - OpenAPI: http://{}:{}/openapi.json", host, port);

    axum::serve(listener, router(validator))
        .await
        .context("API server error")?;

    Ok(())
}
