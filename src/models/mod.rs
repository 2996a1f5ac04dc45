pub mod bankroll;
pub mod bet;
pub mod goal;
pub mod transaction;

pub use bankroll::Bankroll;
pub use bet::Bet;
pub use goal::BankrollGoal;
pub use transaction::Transaction;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Adjustment,
    Profit,
    Loss,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    /// Map a stored positive magnitude to its signed ledger effect.
    /// Adjustments are stored already signed and pass through unchanged.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Deposit
            | TransactionType::Profit
            | TransactionType::TransferIn => amount,
            TransactionType::Withdrawal
            | TransactionType::Loss
            | TransactionType::TransferOut => -amount,
            TransactionType::Adjustment => amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Adjustment => "adjustment",
            TransactionType::Profit => "profit",
            TransactionType::Loss => "loss",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UnitMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "unit_mode", rename_all = "snake_case")]
pub enum UnitMode {
    /// One unit is a fixed currency amount.
    Fixed,
    /// One unit is a fraction of the current balance (0.01 = 1%).
    Percent,
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitMode::Fixed => write!(f, "fixed"),
            UnitMode::Percent => write!(f, "percent"),
        }
    }
}

// ---------------------------------------------------------------------------
// BetStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "bet_status", rename_all = "snake_case")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
        }
    }
}

// ---------------------------------------------------------------------------
// GoalStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "goal_status", rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Met,
    Missed,
}

impl GoalStatus {
    /// Met and missed are terminal; evaluation never moves a goal out of them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GoalStatus::Active)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Met => write!(f, "met"),
            GoalStatus::Missed => write!(f, "missed"),
        }
    }
}

/// Default maximum stake as a fraction of current balance.
pub fn default_max_bet_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

/// Default conservative multiplier applied to full Kelly.
pub fn default_kelly_fraction() -> Decimal {
    Decimal::new(25, 2) // 0.25
}
