use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::BalancePoint;

/// Drawdown statistics over a balance-history series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawdownStats {
    pub running_peak: Decimal,
    pub current_drawdown: Decimal,
    pub current_drawdown_percent: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_percent: Decimal,
}

/// Walk the series once, tracking the running peak and the deepest fall
/// below it. `max_drawdown_percent` is taken against the peak that was
/// active when that deepest fall occurred, not the final peak.
pub fn drawdown_stats(history: &[BalancePoint]) -> DrawdownStats {
    let Some(first) = history.first() else {
        return DrawdownStats {
            running_peak: Decimal::ZERO,
            current_drawdown: Decimal::ZERO,
            current_drawdown_percent: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            max_drawdown_percent: Decimal::ZERO,
        };
    };

    // The peak is the series maximum, seeded from the first point; an
    // all-negative history must not be measured against a phantom zero.
    let mut peak = first.balance;
    let mut current_dd = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;
    let mut max_dd_peak = peak;

    for point in history {
        if point.balance > peak {
            peak = point.balance;
        }
        current_dd = peak - point.balance;
        if current_dd > max_dd {
            max_dd = current_dd;
            max_dd_peak = peak;
        }
    }

    let current_pct = if peak <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        current_dd / peak * Decimal::ONE_HUNDRED
    };
    let max_pct = if max_dd_peak <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        max_dd / max_dd_peak * Decimal::ONE_HUNDRED
    };

    DrawdownStats {
        running_peak: peak,
        current_drawdown: current_dd,
        current_drawdown_percent: current_pct,
        max_drawdown: max_dd,
        max_drawdown_percent: max_pct,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
