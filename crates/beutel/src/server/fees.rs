use axum::extract::State;
use axum::{Extension, Json};

use beutel_core::types::FeeRates;
use beutel_core::LogContext;

use super::error::{record_failure, AppError};
use super::SharedState;

pub(super) async fn get_fees(
    State(state): State<SharedState>,
    Extension(log): Extension<LogContext>,
) -> Result<Json<FeeRates>, AppError> {
    let fees = state
        .provider
        .get_fee_rates(&log)
        .await
        .map_err(|err| record_failure(&log, err))?;
    Ok(Json(fees))
}
