use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Bankroll, UnitMode};

pub struct NewBankroll {
    pub owner_id: Uuid,
    pub name: String,
    pub currency: String,
    pub starting_balance: Decimal,
    pub unit_mode: UnitMode,
    pub unit_value: Decimal,
    pub max_bet_pct: Decimal,
    pub daily_loss_limit_pct: Option<Decimal>,
    pub weekly_loss_limit_pct: Option<Decimal>,
    pub kelly_fraction: Decimal,
}

/// Mutable risk parameters. Starting balance, currency and unit mode are
/// set once at creation and never updated.
pub struct RiskParamsUpdate {
    pub max_bet_pct: Option<Decimal>,
    pub daily_loss_limit_pct: Option<Option<Decimal>>,
    pub weekly_loss_limit_pct: Option<Option<Decimal>>,
    pub kelly_fraction: Option<Decimal>,
    pub unit_value: Option<Decimal>,
}

pub async fn create(pool: &PgPool, new: NewBankroll) -> anyhow::Result<Bankroll> {
    let bankroll = sqlx::query_as::<_, Bankroll>(
        r#"
        INSERT INTO bankrolls (
            owner_id, name, currency, starting_balance, unit_mode,
            unit_value, max_bet_pct, daily_loss_limit_pct,
            weekly_loss_limit_pct, kelly_fraction
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(new.owner_id)
    .bind(&new.name)
    .bind(&new.currency)
    .bind(new.starting_balance)
    .bind(new.unit_mode)
    .bind(new.unit_value)
    .bind(new.max_bet_pct)
    .bind(new.daily_loss_limit_pct)
    .bind(new.weekly_loss_limit_pct)
    .bind(new.kelly_fraction)
    .fetch_one(pool)
    .await?;

    Ok(bankroll)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Bankroll>> {
    let bankroll = sqlx::query_as::<_, Bankroll>("SELECT * FROM bankrolls WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bankroll)
}

pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> anyhow::Result<Vec<Bankroll>> {
    let bankrolls = sqlx::query_as::<_, Bankroll>(
        "SELECT * FROM bankrolls WHERE owner_id = $1 ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(bankrolls)
}

/// Update only the mutable risk parameters, leaving unset fields alone.
/// `daily_loss_limit_pct`/`weekly_loss_limit_pct` take a nested Option so
/// a caller can clear a configured limit (outer Some, inner None).
pub async fn update_risk_params(
    pool: &PgPool,
    id: Uuid,
    update: RiskParamsUpdate,
) -> anyhow::Result<Option<Bankroll>> {
    let bankroll = sqlx::query_as::<_, Bankroll>(
        r#"
        UPDATE bankrolls
        SET max_bet_pct = COALESCE($2, max_bet_pct),
            daily_loss_limit_pct = CASE WHEN $3 THEN $4 ELSE daily_loss_limit_pct END,
            weekly_loss_limit_pct = CASE WHEN $5 THEN $6 ELSE weekly_loss_limit_pct END,
            kelly_fraction = COALESCE($7, kelly_fraction),
            unit_value = COALESCE($8, unit_value),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(update.max_bet_pct)
    .bind(update.daily_loss_limit_pct.is_some())
    .bind(update.daily_loss_limit_pct.flatten())
    .bind(update.weekly_loss_limit_pct.is_some())
    .bind(update.weekly_loss_limit_pct.flatten())
    .bind(update.kelly_fraction)
    .bind(update.unit_value)
    .fetch_optional(pool)
    .await?;

    Ok(bankroll)
}

/// Atomically make `id` the owner's single active bankroll: deactivate
/// every sibling, then activate the target, inside one transaction.
pub async fn activate(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Bankroll>> {
    let mut tx = pool.begin().await?;

    let Some(owner_id) = sqlx::query_scalar::<_, Uuid>(
        "SELECT owner_id FROM bankrolls WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    sqlx::query("UPDATE bankrolls SET is_active = FALSE, updated_at = NOW() WHERE owner_id = $1")
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

    let bankroll = sqlx::query_as::<_, Bankroll>(
        "UPDATE bankrolls SET is_active = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(bankroll_id = %id, owner_id = %owner_id, "Bankroll activated");
    Ok(Some(bankroll))
}

/// Delete a bankroll. Refused while any settled bet exists; the ledger of
/// a bankroll with history is an audit record.
pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let settled_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bets WHERE bankroll_id = $1 AND status <> 'pending'",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if settled_count > 0 {
        anyhow::bail!("bankroll has {settled_count} settled bets and cannot be deleted");
    }

    let result = sqlx::query("DELETE FROM bankrolls WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_active(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bankrolls WHERE is_active")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
