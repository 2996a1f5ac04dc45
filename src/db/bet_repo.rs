use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Bet, BetStatus};

pub struct NewBet {
    pub bankroll_id: Uuid,
    pub bet_type: Option<String>,
    pub stake: Decimal,
    /// Computed by the caller from the balance at placement time and
    /// stored as-is; never recomputed afterwards.
    pub stake_units: Decimal,
    pub potential_payout: Decimal,
}

pub async fn create(pool: &PgPool, new: NewBet) -> anyhow::Result<Bet> {
    let bet = sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (bankroll_id, bet_type, stake, stake_units, potential_payout)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(new.bankroll_id)
    .bind(&new.bet_type)
    .bind(new.stake)
    .bind(new.stake_units)
    .bind(new.potential_payout)
    .fetch_one(pool)
    .await?;

    metrics::counter!("bets_placed_total").increment(1);

    Ok(bet)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Bet>> {
    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bet)
}

pub async fn list_for_bankroll(pool: &PgPool, bankroll_id: Uuid) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE bankroll_id = $1 ORDER BY placed_at",
    )
    .bind(bankroll_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Settle a pending bet: the one-way pending → won|lost transition plus
/// exactly one profit/loss ledger entry, in a single database transaction.
///
/// The entry is keyed on the bet id (unique settlement index), so a
/// concurrent or repeated settle cannot double-book. Re-settling a settled
/// bet is rejected here before any write.
pub async fn settle(
    pool: &PgPool,
    bet_id: Uuid,
    outcome: BetStatus,
    actual_payout: Option<Decimal>,
) -> anyhow::Result<Bet> {
    anyhow::ensure!(outcome.is_settled(), "settlement outcome must be won or lost");

    let mut tx = pool.begin().await?;

    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1 FOR UPDATE")
        .bind(bet_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| anyhow::anyhow!("bet {bet_id} not found"))?;

    if bet.status.is_settled() {
        anyhow::bail!("bet {bet_id} is already settled as {}", bet.status);
    }

    let (tx_type, amount) = bet
        .settlement_entry(outcome, actual_payout)
        .ok_or_else(|| anyhow::anyhow!("actual_payout is required to settle as won"))?;
    let payout = match outcome {
        BetStatus::Won => actual_payout,
        _ => None,
    };

    sqlx::query(
        r#"
        INSERT INTO transactions (bankroll_id, tx_type, amount, reason, ref_bet_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(bet.bankroll_id)
    .bind(tx_type)
    .bind(amount)
    .bind(format!("bet settled: {outcome}"))
    .bind(bet.id)
    .execute(&mut *tx)
    .await?;

    let settled = sqlx::query_as::<_, Bet>(
        r#"
        UPDATE bets
        SET status = $2, actual_payout = $3, settled_at = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(bet.id)
    .bind(outcome)
    .bind(payout)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::counter!("bets_settled_total").increment(1);
    tracing::info!(
        bet_id = %bet_id,
        outcome = %outcome,
        amount = %amount,
        "Bet settled"
    );

    Ok(settled)
}

/// Correct the payout of an already-won bet by adjusting the existing
/// settlement entry in place. Never appends a second entry, so the ledger
/// keeps exactly one settlement per bet.
pub async fn amend_payout(
    pool: &PgPool,
    bet_id: Uuid,
    new_payout: Decimal,
) -> anyhow::Result<Bet> {
    let mut tx = pool.begin().await?;

    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1 FOR UPDATE")
        .bind(bet_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| anyhow::anyhow!("bet {bet_id} not found"))?;

    if bet.status != BetStatus::Won {
        anyhow::bail!("only won bets have a payout to amend (bet is {})", bet.status);
    }

    // A corrected payout can flip the entry across the profit/loss line
    // (e.g. a half-win), so both the type and the magnitude are rewritten.
    let (tx_type, amount) = bet
        .settlement_entry(BetStatus::Won, Some(new_payout))
        .ok_or_else(|| anyhow::anyhow!("no settlement entry for bet {bet_id}"))?;

    sqlx::query(
        r#"
        UPDATE transactions
        SET tx_type = $2, amount = $3
        WHERE ref_bet_id = $1 AND tx_type IN ('profit', 'loss')
        "#,
    )
    .bind(bet.id)
    .bind(tx_type)
    .bind(amount)
    .execute(&mut *tx)
    .await?;

    let updated = sqlx::query_as::<_, Bet>(
        "UPDATE bets SET actual_payout = $2 WHERE id = $1 RETURNING *",
    )
    .bind(bet.id)
    .bind(new_payout)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(bet_id = %bet_id, new_payout = %new_payout, "Bet payout amended");
    Ok(updated)
}
