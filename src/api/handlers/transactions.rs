use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{bankroll_repo, transaction_repo};
use crate::errors::AppError;
use crate::models::{Transaction, TransactionType};
use crate::AppState;

use super::bankrolls::ApiResponse;

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub reason: Option<String>,
}

/// GET /api/bankrolls/{id}/transactions — the ledger in fold order
pub async fn list(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    let txs = transaction_repo::list_for_bankroll(&state.db, bankroll_id).await?;
    Ok(ApiResponse::ok(txs))
}

/// POST /api/bankrolls/{id}/transactions — manual ledger entry.
///
/// Profit and loss entries are owned by bet settlement and cannot be
/// entered by hand; everything else takes a positive magnitude except
/// adjustments, which arrive already signed.
pub async fn create(
    State(state): State<AppState>,
    Path(bankroll_id): Path<Uuid>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    bankroll_repo::get_by_id(&state.db, bankroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    match body.tx_type {
        TransactionType::Profit | TransactionType::Loss => {
            return Err(AppError::Validation(
                "profit/loss entries are created by bet settlement".into(),
            ));
        }
        TransactionType::Adjustment => {
            if body.amount.is_zero() {
                return Err(AppError::Validation("adjustment amount must be non-zero".into()));
            }
        }
        _ => {
            if body.amount <= Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "amount must be > 0, got {}",
                    body.amount
                )));
            }
        }
    }

    let tx = transaction_repo::append(
        &state.db,
        bankroll_id,
        body.tx_type,
        body.amount,
        body.reason.as_deref(),
        None,
    )
    .await?;

    Ok(ApiResponse::ok(tx))
}
