use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use beutel_core::LogContext;

use super::error::{invalid_body, record_failure, AppError};
use super::SharedState;

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BroadcastRequest {
    /// A missing field is treated like an empty one and rejected by the provider.
    #[serde(default)]
    tx_hex: String,
}

#[derive(Serialize)]
pub(super) struct BroadcastResponse {
    txid: String,
}

// ==============================================================================
// Handler
// ==============================================================================

pub(super) async fn broadcast_tx(
    State(state): State<SharedState>,
    Extension(log): Extension<LogContext>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<Json<BroadcastResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected broadcast body");
        invalid_body(&log)
    })?;

    let txid = state
        .provider
        .broadcast_tx(&log, &request.tx_hex)
        .await
        .map_err(|err| record_failure(&log, err))?;

    Ok(Json(BroadcastResponse {
        txid: txid.to_string(),
    }))
}
