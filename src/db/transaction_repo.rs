use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Transaction, TransactionType};

/// Append one ledger entry. The ledger is insert-only; the single
/// exception is the settlement-amount amendment in `bet_repo`.
pub async fn append(
    pool: &PgPool,
    bankroll_id: Uuid,
    tx_type: TransactionType,
    amount: Decimal,
    reason: Option<&str>,
    ref_bet_id: Option<Uuid>,
) -> anyhow::Result<Transaction> {
    let tx = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (bankroll_id, tx_type, amount, reason, ref_bet_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(bankroll_id)
    .bind(tx_type)
    .bind(amount)
    .bind(reason)
    .bind(ref_bet_id)
    .fetch_one(pool)
    .await?;

    metrics::counter!("transactions_recorded_total").increment(1);

    Ok(tx)
}

/// Full ledger for a bankroll in fold order: (created_at, seq) ascending.
pub async fn list_for_bankroll(
    pool: &PgPool,
    bankroll_id: Uuid,
) -> anyhow::Result<Vec<Transaction>> {
    let txs = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE bankroll_id = $1 ORDER BY created_at, seq",
    )
    .bind(bankroll_id)
    .fetch_all(pool)
    .await?;

    Ok(txs)
}

/// The settlement entry for a bet, if one exists.
pub async fn get_settlement(
    pool: &PgPool,
    bet_id: Uuid,
) -> anyhow::Result<Option<Transaction>> {
    let tx = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE ref_bet_id = $1 AND tx_type IN ('profit', 'loss')",
    )
    .bind(bet_id)
    .fetch_optional(pool)
    .await?;

    Ok(tx)
}
