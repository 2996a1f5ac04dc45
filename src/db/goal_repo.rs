use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{BankrollGoal, GoalStatus};

pub struct NewGoal {
    pub bankroll_id: Uuid,
    pub target_amount: Option<Decimal>,
    pub target_profit: Option<Decimal>,
    pub target_date: Option<DateTime<Utc>>,
}

pub async fn create(pool: &PgPool, new: NewGoal) -> anyhow::Result<BankrollGoal> {
    anyhow::ensure!(
        new.target_amount.is_some() || new.target_profit.is_some(),
        "a goal needs a target amount or a target profit"
    );

    let goal = sqlx::query_as::<_, BankrollGoal>(
        r#"
        INSERT INTO bankroll_goals (bankroll_id, target_amount, target_profit, target_date)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(new.bankroll_id)
    .bind(new.target_amount)
    .bind(new.target_profit)
    .bind(new.target_date)
    .fetch_one(pool)
    .await?;

    Ok(goal)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<BankrollGoal>> {
    let goal = sqlx::query_as::<_, BankrollGoal>("SELECT * FROM bankroll_goals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(goal)
}

pub async fn list_for_bankroll(
    pool: &PgPool,
    bankroll_id: Uuid,
) -> anyhow::Result<Vec<BankrollGoal>> {
    let goals = sqlx::query_as::<_, BankrollGoal>(
        "SELECT * FROM bankroll_goals WHERE bankroll_id = $1 ORDER BY created_at",
    )
    .bind(bankroll_id)
    .fetch_all(pool)
    .await?;

    Ok(goals)
}

/// Persist a status computed by goal evaluation. Transitions are one-way;
/// a terminal row is left untouched.
pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: GoalStatus,
) -> anyhow::Result<BankrollGoal> {
    let goal = sqlx::query_as::<_, BankrollGoal>(
        r#"
        UPDATE bankroll_goals
        SET status = $2
        WHERE id = $1 AND status = 'active'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    match goal {
        Some(goal) => Ok(goal),
        // Already terminal: return the row as it stands.
        None => get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("goal {id} not found")),
    }
}
