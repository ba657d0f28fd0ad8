use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use beutel_core::{CoreError, LogContext};

// ==============================================================================
// Error Type
// ==============================================================================

pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Record a provider failure on the request's canonical log and map it to a
/// response: validation failures are the caller's fault, everything else is
/// the upstream's.
pub(super) fn record_failure(log: &LogContext, err: CoreError) -> AppError {
    let message = err.to_string();
    log.add("error", message.as_str());
    log.add("error_type", err.error_type());

    match err {
        CoreError::Validation(_) => AppError::BadRequest(message),
        CoreError::Upstream(_) => AppError::BadGateway(message),
    }
}

/// Record a request body that could not be parsed.
pub(super) fn invalid_body(log: &LogContext) -> AppError {
    const MESSAGE: &str = "invalid request body";
    log.add("error", MESSAGE);
    log.add("error_type", "validation_error");
    AppError::BadRequest(MESSAGE.to_owned())
}
