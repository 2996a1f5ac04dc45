use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{bankroll_repo, bet_repo, transaction_repo};
use crate::engine::{check_max_bet, current_balance, stake_to_units};
use crate::errors::AppError;
use crate::models::{Bet, BetStatus};
use crate::AppState;

use super::bankrolls::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateBetRequest {
    pub bet_type: Option<String>,
    pub stake: Decimal,
    pub potential_payout: Decimal,
}

#[derive(Deserialize)]
pub struct SettleBetRequest {
    pub outcome: BetStatus,
    pub actual_payout: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct AmendPayoutRequest {
    pub actual_payout: Decimal,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/bankrolls/{id}/bets
pub async fn list(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Bet>>>, AppError> {
    bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let bets = bet_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    Ok(ApiResponse::ok(bets))
}

/// POST /api/bankrolls/{id}/bets — place a bet.
///
/// The unit count is sized against the balance at this instant and frozen
/// on the row; later balance moves never rewrite it.
pub async fn create(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
    Json(body): Json<CreateBetRequest>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    if body.stake <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "stake must be > 0, got {}",
            body.stake
        )));
    }
    if body.potential_payout <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "potential_payout must be > 0, got {}",
            body.potential_payout
        )));
    }

    let bankroll = bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    let balance = current_balance(&bankroll, &txs);

    check_max_bet(body.stake, &bankroll, balance)?;
    let stake_units = stake_to_units(body.stake, &bankroll, balance)?;

    let bet = bet_repo::create(
        &state.db,
        bet_repo::NewBet {
            bankroll_id,
            bet_type: body.bet_type,
            stake: body.stake,
            stake_units,
            potential_payout: body.potential_payout,
        },
    )
    .await?;

    tracing::info!(
        bet_id = %bet.id,
        bankroll_id = %bankroll_id,
        stake = %bet.stake,
        stake_units = %bet.stake_units,
        "Bet placed"
    );
    Ok(ApiResponse::ok(bet))
}

/// POST /api/bets/{id}/settle — one-way pending → won|lost.
///
/// Settlements on the same bankroll are serialized through the per-bankroll
/// lock so the ledger gains exactly one entry per bet.
pub async fn settle(
    State(state): State<AppState>,
    Path(bet_id): Path<Uuid>,
    Json(body): Json<SettleBetRequest>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    if !body.outcome.is_settled() {
        return Err(AppError::Validation("outcome must be won or lost".into()));
    }
    if body.outcome == BetStatus::Won && body.actual_payout.is_none() {
        return Err(AppError::Validation(
            "actual_payout is required to settle as won".into(),
        ));
    }

    let bet = bet_repo::get_by_id(&state.db, bet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bet not found".into()))?;

    let lock = state.settlement_locks.for_bankroll(bet.bankroll_id).await;
    let _guard = lock.lock().await;

    let settled = bet_repo::settle(&state.db, bet_id, body.outcome, body.actual_payout)
        .await
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    Ok(ApiResponse::ok(settled))
}

/// PUT /api/bets/{id}/payout — correct a won bet's payout in place
pub async fn amend_payout(
    State(state): State<AppState>,
    Path(bet_id): Path<Uuid>,
    Json(body): Json<AmendPayoutRequest>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    if body.actual_payout < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "actual_payout must be >= 0, got {}",
            body.actual_payout
        )));
    }

    let bet = bet_repo::get_by_id(&state.db, bet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bet not found".into()))?;

    let lock = state.settlement_locks.for_bankroll(bet.bankroll_id).await;
    let _guard = lock.lock().await;

    let updated = bet_repo::amend_payout(&state.db, bet_id, body.actual_payout)
        .await
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    Ok(ApiResponse::ok(updated))
}
