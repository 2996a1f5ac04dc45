use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BankrollGoal, GoalStatus};

/// Outcome of evaluating a goal against the bankroll's current numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalEvaluation {
    pub progress_percent: Decimal,
    pub status: GoalStatus,
}

/// Progress toward the goal's target, as a percentage.
///
/// An absolute `target_amount` is measured against the current balance; a
/// relative `target_profit` against net profit. Zero targets yield zero
/// progress rather than a divide error.
pub fn goal_progress(
    goal: &BankrollGoal,
    current_balance: Decimal,
    net_profit: Decimal,
) -> Decimal {
    let (achieved, target) = if let Some(target_amount) = goal.target_amount {
        (current_balance, target_amount)
    } else if let Some(target_profit) = goal.target_profit {
        (net_profit, target_profit)
    } else {
        return Decimal::ZERO;
    };

    if target.is_zero() {
        return Decimal::ZERO;
    }

    achieved / target * Decimal::ONE_HUNDRED
}

/// Evaluate a goal: compute progress and apply the one-way status
/// transitions. Terminal goals come back unchanged; an active goal moves
/// to met at 100% progress, or to missed once its deadline passes short.
pub fn evaluate_goal(
    goal: &BankrollGoal,
    current_balance: Decimal,
    net_profit: Decimal,
    now: DateTime<Utc>,
) -> GoalEvaluation {
    let progress_percent = goal_progress(goal, current_balance, net_profit);

    let status = if goal.status.is_terminal() {
        goal.status
    } else if progress_percent >= Decimal::ONE_HUNDRED {
        GoalStatus::Met
    } else if goal.target_date.map(|d| d < now).unwrap_or(false) {
        GoalStatus::Missed
    } else {
        GoalStatus::Active
    };

    GoalEvaluation {
        progress_percent,
        status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
