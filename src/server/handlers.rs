// src/server/handlers.rs
// =============================================================================
// Request handlers. Every JSON body goes out through json_response so the
// CORS header is never missing.
// =============================================================================

use axum::extract::{Query, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::openapi::openapi_document;
use crate::config::{parse_limit, ValidatorConfig};
use crate::validator::Validator;

/// Query string of `/check`. Both stay strings so bad values get our own 400.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckParams {
    pub url: Option<String>,
    pub limit: Option<String>,
}

impl CheckParams {
    // First value wins when a key is repeated; unknown keys are ignored
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "url" if params.url.is_none() => params.url = Some(value),
                "limit" if params.limit.is_none() => params.limit = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Body of a 400: same keys as a ValidationResult minus the report parts
#[derive(Debug, Serialize)]
struct Rejection {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Rejection {
    fn new(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }
}

/// GET /check
pub async fn check_handler(
    State(validator): State<Validator>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = CheckParams::from_pairs(pairs);
    let url = match params.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => {
            return json_response(
                StatusCode::BAD_REQUEST,
                &Rejection::new("URL parameter is required"),
            )
        }
    };

    let limit = match parse_limit(params.limit.as_deref()) {
        Ok(limit) => limit,
        Err(error) => {
            return json_response(StatusCode::BAD_REQUEST, &Rejection::new(error.to_string()))
        }
    };

    let config = ValidatorConfig::with_limit(limit);
    let result = validator.validate(url, &config).await;
    json_response(StatusCode::OK, &result)
}

/// GET /openapi.json
pub async fn openapi_handler() -> Response {
    json_response(StatusCode::OK, &openapi_document())
}

/// GET / sends people to the API description
pub async fn root_handler() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/openapi.json")]).into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

// Pretty JSON with the CORS header every endpoint sends
fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let body = match serde_json::to_string_pretty(body) {
        Ok(body) => body,
        Err(error) => {
            log::error!("failed to serialize response: {}", error);
            format!(
                "{{\"valid\":false,\"errors\":[{}],\"warnings\":[]}}",
                serde_json::Value::String(format!("Unexpected error: {}", error))
            )
        }
    };

    (
        status,
        [
            (CONTENT_TYPE, "application/json"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response()
}
