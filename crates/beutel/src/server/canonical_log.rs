//! One structured log line per request.
//!
//! The middleware creates a [`LogContext`] for each request and stores it in
//! the request extensions, where handlers (and the providers they call) add
//! fields. When the request completes, or is dropped mid-flight, the fields
//! are emitted exactly once as a single `request` event.

use std::time::Instant;

use axum::body::HttpBody;
use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use beutel_core::LogContext;

pub(crate) const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub(super) async fn canonical_log(mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = new_request_id();

    let log = LogContext::new();
    log.add("request_id", request_id.as_str());
    log.add("method", request.method().as_str());
    log.add("path", request.uri().path());
    if let Some(matched) = request.extensions().get::<MatchedPath>() {
        log.add("route", matched.as_str());
    }
    request.extensions_mut().insert(log.clone());

    let guard = FlushOnDrop(log);
    let mut response = next.run(request).await;

    let log = &guard.0;
    log.add("status", response.status().as_u16());
    log.add(
        "duration_ms",
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );
    if let Some(bytes) = response.body().size_hint().exact() {
        log.add("response_bytes", bytes);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    drop(guard);
    response
}

/// Emits the canonical line when dropped, so a request whose future is
/// cancelled (client hung up) is still logged.
struct FlushOnDrop(LogContext);

impl Drop for FlushOnDrop {
    fn drop(&mut self) {
        emit(&self.0);
    }
}

fn emit(log: &LogContext) {
    let Some(fields) = log.take_for_flush() else {
        return;
    };
    let status = fields.get("status").and_then(Value::as_u64);
    let fields = Value::Object(fields.into_iter().collect());

    match status {
        Some(s) if s >= 500 => tracing::error!(target: "beutel::request", %fields, "request"),
        Some(s) if s >= 400 => tracing::warn!(target: "beutel::request", %fields, "request"),
        Some(_) => tracing::info!(target: "beutel::request", %fields, "request"),
        None => tracing::warn!(target: "beutel::request", %fields, "request cancelled"),
    }
}

/// 128 random bits, hex-encoded.
fn new_request_id() -> String {
    use rand::Rng;
    let bytes: [u8; 16] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
