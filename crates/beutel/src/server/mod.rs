mod address;
mod broadcast;
mod canonical_log;
mod error;
mod fees;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use beutel_core::{ChainProvider, Network};

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub provider: Arc<dyn ChainProvider>,
    pub network: Network,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([canonical_log::REQUEST_ID_HEADER]);

    let shared = Arc::new(state);

    let v1 = Router::new()
        .route("/v1/address/{address}/balance", get(address::get_balance))
        .route("/v1/address/{address}/utxos", get(address::get_utxos))
        .route(
            "/v1/address/{address}/transactions",
            get(address::get_transactions),
        )
        .route("/v1/fees", get(fees::get_fees))
        .route("/v1/tx/broadcast", post(broadcast::broadcast_tx));

    let router = Router::new()
        .route("/health", get(health))
        .merge(v1)
        .fallback(route_not_found)
        .with_state(shared);

    with_request_layers(router).layer(cors)
}

/// Canonical request logging around panic recovery, so a panicking handler
/// still yields a 500 and a log line.
pub(crate) fn with_request_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn(canonical_log::canonical_log))
}

async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "network": state.network }))
}

async fn route_not_found() -> error::AppError {
    error::AppError::NotFound("route not found".to_string())
}
