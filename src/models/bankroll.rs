use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnitMode;

/// Database row for the bankrolls table.
///
/// `starting_balance`, `currency` and `unit_mode` are set once at creation;
/// risk parameters stay mutable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bankroll {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub currency: String,
    pub starting_balance: Decimal,
    pub unit_mode: UnitMode,
    /// Currency amount per unit (fixed mode) or fraction of current
    /// balance per unit (percent mode, 0.01 = 1%).
    pub unit_value: Decimal,
    /// Max stake as fraction of current balance, in (0, 1].
    pub max_bet_pct: Decimal,
    /// Trailing-window loss limits as fractions of current balance.
    /// None means no limit configured.
    pub daily_loss_limit_pct: Option<Decimal>,
    pub weekly_loss_limit_pct: Option<Decimal>,
    /// Conservative multiplier applied to full Kelly, in (0, 1].
    pub kelly_fraction: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
