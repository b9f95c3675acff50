use axum::{extract::State, Json};
use tracing::Instrument;
use validator::Validate;

use crate::{
    domain::{WithdrawRequest, WithdrawResponse},
    errors::{AppError, Result},
    state::AppState,
};

pub async fn process_withdraw(
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>> {
    let span = tracing::info_span!(
        "process_withdraw",
        amount_subunits = req.amount_subunits,
    );

    req.validate()
        .map_err(|e| AppError::InvalidAmount(e.to_string()))?;

    let result = state
        .treasury
        .process_withdrawal(&req.user_address, req.amount_subunits)
        .instrument(span)
        .await;

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            metrics::counter!("withdrawals_failed_total").increment(1);
            return Err(e);
        }
    };

    tracing::info!(
        tx_hash = %response.transaction_hash,
        "Withdrawal processed successfully"
    );
    metrics::counter!("withdrawals_processed_total").increment(1);

    Ok(Json(response))
}
