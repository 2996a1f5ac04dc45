use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{bankroll_repo, bet_repo, goal_repo, transaction_repo};
use crate::engine::{analyze, current_balance, evaluate_goal, DateRange, GoalEvaluation};
use crate::errors::AppError;
use crate::models::BankrollGoal;
use crate::AppState;

use super::bankrolls::ApiResponse;

#[derive(Deserialize)]
pub struct CreateGoalRequest {
    pub target_amount: Option<Decimal>,
    pub target_profit: Option<Decimal>,
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct GoalProgressResponse {
    pub goal: BankrollGoal,
    pub evaluation: GoalEvaluation,
}

/// GET /api/bankrolls/{id}/goals
pub async fn list(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BankrollGoal>>>, AppError> {
    bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let goals = goal_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    Ok(ApiResponse::ok(goals))
}

/// POST /api/bankrolls/{id}/goals
pub async fn create(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<Json<ApiResponse<BankrollGoal>>, AppError> {
    if body.target_amount.is_none() && body.target_profit.is_none() {
        return Err(AppError::Validation(
            "a goal needs a target_amount or a target_profit".into(),
        ));
    }

    bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let goal = goal_repo::create(
        &state.db,
        goal_repo::NewGoal {
            bankroll_id,
            target_amount: body.target_amount,
            target_profit: body.target_profit,
            target_date: body.target_date,
        },
    )
    .await?;

    Ok(ApiResponse::ok(goal))
}

/// POST /api/goals/{id}/evaluate — recompute progress against the current
/// balance and net profit, persisting a met/missed transition when one
/// occurs. Evaluation runs on request; nothing transitions in the
/// background.
pub async fn evaluate(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GoalProgressResponse>>, AppError> {
    let goal = goal_repo::get_by_id(&state.db, goal_id)
        .await?
        .ok_or_else(|| AppError::NotFound("goal not found".into()))?;

    let bankroll = bankroll_repo::get_by_id(&state.db, goal.bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll.id).await?;
    let bets = bet_repo::list_for_bankroll(&state.db, bankroll.id).await?;

    let balance = current_balance(&bankroll, &txs);
    let net_profit = analyze(&bankroll, &bets, DateRange::default(), |b| {
        b.bet_type.clone().unwrap_or_else(|| "uncategorized".into())
    })
    .net_profit;

    let evaluation = evaluate_goal(&goal, balance, net_profit, Utc::now());

    let goal = if evaluation.status != goal.status {
        goal_repo::set_status(&state.db, goal.id, evaluation.status).await?
    } else {
        goal
    };

    Ok(ApiResponse::ok(GoalProgressResponse { goal, evaluation }))
}
