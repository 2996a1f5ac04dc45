use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{bankroll_repo, transaction_repo};
use crate::engine::{self, current_balance, KellyRecommendation};
use crate::errors::AppError;
use crate::AppState;

use super::bankrolls::ApiResponse;

#[derive(Deserialize)]
pub struct KellyRequest {
    pub win_probability: Decimal,
    pub decimal_odds: Decimal,
}

/// POST /api/bankrolls/{id}/kelly — optimal stake suggestion for the
/// given probability/odds pair, at full Kelly and at the bankroll's
/// conservative fraction
pub async fn compute(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
    Json(body): Json<KellyRequest>,
) -> Result<Json<ApiResponse<KellyRecommendation>>, AppError> {
    let bankroll = bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    let balance = current_balance(&bankroll, &txs);

    let recommendation = engine::kelly(body.win_probability, body.decimal_odds, &bankroll, balance)?;

    metrics::counter!("kelly_requests_total").increment(1);
    Ok(ApiResponse::ok(recommendation))
}
