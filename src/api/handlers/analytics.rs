use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{bankroll_repo, bet_repo, transaction_repo};
use crate::engine::{
    analyze, balance_history, current_balance, drawdown_stats, BalancePoint, BetAnalytics,
    DateRange, DrawdownStats,
};
use crate::errors::AppError;
use crate::models::{Bankroll, Bet};
use crate::AppState;

use super::bankrolls::ApiResponse;

#[derive(Deserialize, Default)]
pub struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct BalanceHistoryResponse {
    pub current_balance: Decimal,
    pub history: Vec<BalancePoint>,
}

fn category_key(bet: &Bet) -> String {
    bet.bet_type.clone().unwrap_or_else(|| "uncategorized".into())
}

async fn load_bankroll(state: &AppState, id: Uuid) -> Result<Bankroll, AppError> {
    bankroll_repo::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))
}

/// GET /api/bankrolls/{id}/analytics — settled-bet aggregates, optionally
/// restricted to a settlement-date range
pub async fn summary(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ApiResponse<BetAnalytics>>, AppError> {
    let bankroll = load_bankroll(&state, bankroll_id).await?;
    let bets = bet_repo::list_for_bankroll(&state.db, bankroll_id).await?;

    let analytics = analyze(
        &bankroll,
        &bets,
        DateRange {
            from: range.from,
            to: range.to,
        },
        category_key,
    );

    Ok(ApiResponse::ok(analytics))
}

/// GET /api/bankrolls/{id}/balance-history
pub async fn history(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BalanceHistoryResponse>>, AppError> {
    let bankroll = load_bankroll(&state, bankroll_id).await?;
    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;

    Ok(ApiResponse::ok(BalanceHistoryResponse {
        current_balance: current_balance(&bankroll, &txs),
        history: balance_history(&bankroll, &txs),
    }))
}

/// GET /api/bankrolls/{id}/drawdown
pub async fn drawdown(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DrawdownStats>>, AppError> {
    let bankroll = load_bankroll(&state, bankroll_id).await?;
    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;

    let stats = drawdown_stats(&balance_history(&bankroll, &txs));
    Ok(ApiResponse::ok(stats))
}
