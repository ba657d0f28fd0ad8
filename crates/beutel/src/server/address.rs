use axum::extract::{Path, State};
use axum::{Extension, Json};

use beutel_core::types::{Balance, EnrichedTransaction, Utxo};
use beutel_core::LogContext;

use super::error::{record_failure, AppError};
use super::SharedState;

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn get_balance(
    State(state): State<SharedState>,
    Extension(log): Extension<LogContext>,
    Path(address): Path<String>,
) -> Result<Json<Balance>, AppError> {
    log.add("address", address.as_str());

    let balance = state
        .provider
        .get_balance(&log, &address)
        .await
        .map_err(|err| record_failure(&log, err))?;
    Ok(Json(balance))
}

pub(super) async fn get_utxos(
    State(state): State<SharedState>,
    Extension(log): Extension<LogContext>,
    Path(address): Path<String>,
) -> Result<Json<Vec<Utxo>>, AppError> {
    log.add("address", address.as_str());

    let utxos = state
        .provider
        .get_utxos(&log, &address)
        .await
        .map_err(|err| record_failure(&log, err))?;
    log.add("utxo_count", utxos.len());
    Ok(Json(utxos))
}

pub(super) async fn get_transactions(
    State(state): State<SharedState>,
    Extension(log): Extension<LogContext>,
    Path(address): Path<String>,
) -> Result<Json<Vec<EnrichedTransaction>>, AppError> {
    log.add("address", address.as_str());

    let txs = state
        .provider
        .get_transactions(&log, &address)
        .await
        .map_err(|err| record_failure(&log, err))?;
    log.add("tx_count", txs.len());
    Ok(Json(txs))
}
