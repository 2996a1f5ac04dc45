use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::db::{bankroll_repo, transaction_repo};
use crate::engine::{check_loss_limit, LossLimitCheck, LossWindow};
use crate::errors::AppError;
use crate::AppState;

use super::bankrolls::ApiResponse;

async fn run_check(
    state: &AppState,
    bankroll_id: Uuid,
    window: LossWindow,
) -> Result<LossLimitCheck, AppError> {
    let bankroll = bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    let check = check_loss_limit(&bankroll, &txs, window, Utc::now());

    metrics::counter!("loss_limit_checks_total").increment(1);
    if check.limit_exceeded {
        metrics::counter!("loss_limit_breaches_total").increment(1);
    }

    Ok(check)
}

/// GET /api/bankrolls/{id}/risk/daily
pub async fn daily(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LossLimitCheck>>, AppError> {
    let check = run_check(&state, bankroll_id, LossWindow::Daily).await?;
    Ok(ApiResponse::ok(check))
}

/// GET /api/bankrolls/{id}/risk/weekly
pub async fn weekly(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LossLimitCheck>>, AppError> {
    let check = run_check(&state, bankroll_id, LossWindow::Weekly).await?;
    Ok(ApiResponse::ok(check))
}
