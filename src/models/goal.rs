use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::GoalStatus;

/// Database row for the bankroll_goals table.
///
/// At least one of `target_amount` (absolute balance) and `target_profit`
/// (relative gain) is set; the write path enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BankrollGoal {
    pub id: Uuid,
    pub bankroll_id: Uuid,
    pub target_amount: Option<Decimal>,
    pub target_profit: Option<Decimal>,
    pub target_date: Option<DateTime<Utc>>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}
