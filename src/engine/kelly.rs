use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::units::stake_to_units;
use crate::models::Bankroll;

/// Rejected Kelly input. Out-of-range odds or probability surface to the
/// caller instead of being clamped; a silently "fixed" input would hide a
/// data-entry error behind a plausible-looking stake.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KellyInputError {
    #[error("win probability must be strictly between 0 and 1, got {0}")]
    ProbabilityOutOfRange(Decimal),

    #[error("decimal odds must be greater than 1, got {0}")]
    OddsOutOfRange(Decimal),
}

/// Kelly sizing output, in currency and (where defined) units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyRecommendation {
    /// Expected value per unit staked, as a percentage.
    pub edge_percent: Decimal,
    /// Full Kelly fraction of the bankroll, as a percentage. Never
    /// negative: no edge means no bet, not a negative stake.
    pub kelly_percent: Decimal,
    pub suggested_bet_size: Decimal,
    /// None when unit conversion is undefined for this bankroll/balance.
    pub suggested_units: Option<Decimal>,
    /// Suggested size scaled by the bankroll's conservative multiplier
    /// (e.g. quarter-Kelly).
    pub fractional_kelly_bet_size: Decimal,
    pub fractional_kelly_units: Option<Decimal>,
}

/// Classic Kelly: f = (p·(b−1) − (1−p)) / (b−1), clamped to zero when the
/// edge is negative.
pub fn kelly(
    win_probability: Decimal,
    decimal_odds: Decimal,
    bankroll: &Bankroll,
    current_balance: Decimal,
) -> Result<KellyRecommendation, KellyInputError> {
    if win_probability <= Decimal::ZERO || win_probability >= Decimal::ONE {
        return Err(KellyInputError::ProbabilityOutOfRange(win_probability));
    }
    if decimal_odds <= Decimal::ONE {
        return Err(KellyInputError::OddsOutOfRange(decimal_odds));
    }

    let b_net = decimal_odds - Decimal::ONE;
    let q = Decimal::ONE - win_probability;
    let fraction = ((win_probability * b_net - q) / b_net).max(Decimal::ZERO);

    let edge_percent = (win_probability * decimal_odds - Decimal::ONE) * Decimal::ONE_HUNDRED;
    let kelly_percent = fraction * Decimal::ONE_HUNDRED;

    let suggested_bet_size = fraction * current_balance;
    let fractional_kelly_bet_size = suggested_bet_size * bankroll.kelly_fraction;

    // Units are advisory; an undefined conversion must not fail the
    // recommendation itself.
    let suggested_units = stake_to_units(suggested_bet_size, bankroll, current_balance).ok();
    let fractional_kelly_units =
        stake_to_units(fractional_kelly_bet_size, bankroll, current_balance).ok();

    Ok(KellyRecommendation {
        edge_percent,
        kelly_percent,
        suggested_bet_size,
        suggested_units,
        fractional_kelly_bet_size,
        fractional_kelly_units,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitMode;
    use chrono::Utc;
    use uuid::Uuid;

    fn bankroll(kelly_fraction: Decimal) -> Bankroll {
        Bankroll {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "test".into(),
            currency: "USD".into(),
            starting_balance: Decimal::from(1000),
            unit_mode: UnitMode::Fixed,
            unit_value: Decimal::from(10),
            max_bet_pct: Decimal::new(5, 2),
            daily_loss_limit_pct: None,
            weekly_loss_limit_pct: None,
            kelly_fraction,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_quarter_kelly_scenario() {
        // p = 0.55, b = 2.00, quarter Kelly, balance 1000
        let br = bankroll(Decimal::new(25, 2));
        let rec = kelly(
            Decimal::new(55, 2),
            Decimal::from(2),
            &br,
            Decimal::from(1000),
        )
        .unwrap();

        assert_eq!(rec.edge_percent, Decimal::from(10));
        assert_eq!(rec.kelly_percent, Decimal::from(10));
        assert_eq!(rec.suggested_bet_size, Decimal::from(100));
        assert_eq!(rec.fractional_kelly_bet_size, Decimal::from(25));
        assert_eq!(rec.suggested_units, Some(Decimal::from(10)));
        assert_eq!(rec.fractional_kelly_units, Some(Decimal::new(25, 1)));
    }

    #[test]
    fn test_no_edge_means_no_bet() {
        // p·b = 0.5 · 2.0 = 1.0 → zero edge, zero stake
        let br = bankroll(Decimal::new(25, 2));
        let rec = kelly(
            Decimal::new(50, 2),
            Decimal::from(2),
            &br,
            Decimal::from(1000),
        )
        .unwrap();
        assert_eq!(rec.kelly_percent, Decimal::ZERO);
        assert_eq!(rec.suggested_bet_size, Decimal::ZERO);
        assert_eq!(rec.fractional_kelly_bet_size, Decimal::ZERO);
    }

    #[test]
    fn test_negative_edge_clamped_to_zero() {
        let br = bankroll(Decimal::new(25, 2));
        let rec = kelly(
            Decimal::new(30, 2),
            Decimal::from(2),
            &br,
            Decimal::from(1000),
        )
        .unwrap();
        assert_eq!(rec.kelly_percent, Decimal::ZERO);
        assert_eq!(rec.suggested_bet_size, Decimal::ZERO);
        assert!(rec.edge_percent < Decimal::ZERO);
    }

    #[test]
    fn test_probability_bounds_rejected() {
        let br = bankroll(Decimal::new(25, 2));
        for p in [Decimal::ZERO, Decimal::ONE, Decimal::from(-1), Decimal::from(2)] {
            let result = kelly(p, Decimal::from(2), &br, Decimal::from(1000));
            assert!(matches!(
                result,
                Err(KellyInputError::ProbabilityOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_odds_bounds_rejected() {
        let br = bankroll(Decimal::new(25, 2));
        for b in [Decimal::ONE, Decimal::ZERO, Decimal::new(95, 2)] {
            let result = kelly(Decimal::new(55, 2), b, &br, Decimal::from(1000));
            assert!(matches!(result, Err(KellyInputError::OddsOutOfRange(_))));
        }
    }

    #[test]
    fn test_undefined_units_do_not_fail_recommendation() {
        let mut br = bankroll(Decimal::new(25, 2));
        br.unit_value = Decimal::ZERO;
        let rec = kelly(
            Decimal::new(55, 2),
            Decimal::from(2),
            &br,
            Decimal::from(1000),
        )
        .unwrap();
        assert_eq!(rec.suggested_bet_size, Decimal::from(100));
        assert_eq!(rec.suggested_units, None);
        assert_eq!(rec.fractional_kelly_units, None);
    }
}
