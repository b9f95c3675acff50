use axum::{extract::State, Json};

use crate::{domain::TreasuryResponse, errors::Result, state::AppState};

pub async fn treasury_status(State(state): State<AppState>) -> Result<Json<TreasuryResponse>> {
    let response = state.treasury.status().await?;
    tracing::debug!(
        status = ?response.status,
        balance = %response.balance_subunits,
        "Treasury status retrieved"
    );
    Ok(Json(response))
}
