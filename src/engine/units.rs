use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Bankroll, UnitMode};

/// Unit conversion failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    /// Zero unit value, or zero balance in percent mode. Callers render
    /// this as "units undefined" rather than failing the request.
    #[error("unit conversion undefined: unit_value={unit_value}, balance={balance}")]
    UnitsUndefined {
        unit_value: Decimal,
        balance: Decimal,
    },
}

/// The currency value of one unit under the bankroll's sizing mode.
///
/// Fails when the unit value is zero, or when the mode is percent and the
/// current balance is zero.
fn unit_worth(bankroll: &Bankroll, current_balance: Decimal) -> Result<Decimal, UnitError> {
    let worth = match bankroll.unit_mode {
        UnitMode::Fixed => bankroll.unit_value,
        UnitMode::Percent => bankroll.unit_value * current_balance,
    };

    if worth.is_zero() {
        return Err(UnitError::UnitsUndefined {
            unit_value: bankroll.unit_value,
            balance: current_balance,
        });
    }

    Ok(worth)
}

/// Express a stake as a unit count. The result is a snapshot against the
/// balance passed in; stored unit counts are never recomputed when the
/// balance later moves.
pub fn stake_to_units(
    stake: Decimal,
    bankroll: &Bankroll,
    current_balance: Decimal,
) -> Result<Decimal, UnitError> {
    Ok(stake / unit_worth(bankroll, current_balance)?)
}

/// Inverse of [`stake_to_units`].
pub fn units_to_stake(
    units: Decimal,
    bankroll: &Bankroll,
    current_balance: Decimal,
) -> Result<Decimal, UnitError> {
    Ok(units * unit_worth(bankroll, current_balance)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn bankroll(mode: UnitMode, unit_value: Decimal) -> Bankroll {
        Bankroll {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "test".into(),
            currency: "USD".into(),
            starting_balance: Decimal::from(1000),
            unit_mode: mode,
            unit_value,
            max_bet_pct: Decimal::new(5, 2),
            daily_loss_limit_pct: None,
            weekly_loss_limit_pct: None,
            kelly_fraction: Decimal::new(25, 2),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_fixed_mode_conversion() {
        let br = bankroll(UnitMode::Fixed, Decimal::from(10));
        let units = stake_to_units(Decimal::from(50), &br, Decimal::from(1000)).unwrap();
        assert_eq!(units, Decimal::from(5));
    }

    #[test]
    fn test_percent_mode_conversion() {
        // 1% of 2000 = 20 per unit → $40 stake = 2 units
        let br = bankroll(UnitMode::Percent, Decimal::new(1, 2));
        let units = stake_to_units(Decimal::from(40), &br, Decimal::from(2000)).unwrap();
        assert_eq!(units, Decimal::from(2));

        // Same stake against a doubled balance is half the units
        let units = stake_to_units(Decimal::from(40), &br, Decimal::from(4000)).unwrap();
        assert_eq!(units, Decimal::from(1));
    }

    #[test]
    fn test_round_trip_fixed() {
        let br = bankroll(UnitMode::Fixed, Decimal::new(75, 1)); // 7.5 per unit
        let bal = Decimal::from(1000);
        let stake = Decimal::new(4250, 2); // 42.50
        let back = units_to_stake(stake_to_units(stake, &br, bal).unwrap(), &br, bal).unwrap();
        assert!((back - stake).abs() < Decimal::new(1, 6));
    }

    #[test]
    fn test_round_trip_percent() {
        let br = bankroll(UnitMode::Percent, Decimal::new(25, 3)); // 2.5%
        let bal = Decimal::from(3175);
        let stake = Decimal::new(1299, 2);
        let back = units_to_stake(stake_to_units(stake, &br, bal).unwrap(), &br, bal).unwrap();
        assert!((back - stake).abs() < Decimal::new(1, 6));
    }

    #[test]
    fn test_zero_unit_value_undefined() {
        let br = bankroll(UnitMode::Fixed, Decimal::ZERO);
        let result = stake_to_units(Decimal::from(50), &br, Decimal::from(1000));
        assert!(matches!(result, Err(UnitError::UnitsUndefined { .. })));
    }

    #[test]
    fn test_percent_mode_zero_balance_undefined() {
        let br = bankroll(UnitMode::Percent, Decimal::new(1, 2));
        let result = stake_to_units(Decimal::from(50), &br, Decimal::ZERO);
        assert!(matches!(result, Err(UnitError::UnitsUndefined { .. })));
    }

    #[test]
    fn test_fixed_mode_ignores_balance() {
        let br = bankroll(UnitMode::Fixed, Decimal::from(10));
        let a = stake_to_units(Decimal::from(50), &br, Decimal::from(100)).unwrap();
        let b = stake_to_units(Decimal::from(50), &br, Decimal::from(100_000)).unwrap();
        assert_eq!(a, b);
    }
}
