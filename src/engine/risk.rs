use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::balance::current_balance;
use crate::models::{Bankroll, Transaction, TransactionType};

/// Trailing window a loss limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossWindow {
    /// [midnight today, now), UTC.
    Daily,
    /// [most recent Monday midnight, now), UTC.
    Weekly,
}

impl LossWindow {
    /// Start of the window containing `now`. Stable across the day: the
    /// boundary depends only on the date (and weekday), never on the
    /// time-of-day the check runs.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();

        match self {
            LossWindow::Daily => midnight,
            LossWindow::Weekly => {
                let days_since_monday =
                    now.date_naive().weekday().num_days_from_monday() as i64;
                midnight - Duration::days(days_since_monday)
            }
        }
    }

    fn limit_pct(&self, bankroll: &Bankroll) -> Option<Decimal> {
        match self {
            LossWindow::Daily => bankroll.daily_loss_limit_pct,
            LossWindow::Weekly => bankroll.weekly_loss_limit_pct,
        }
    }
}

/// Result of a trailing loss-limit evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossLimitCheck {
    pub window: LossWindow,
    pub window_start: DateTime<Utc>,
    /// Realized losses inside the window (positive magnitude).
    pub current_loss: Decimal,
    /// Limit in currency, against the *current* balance. Zero when no
    /// percentage is configured.
    pub limit: Decimal,
    pub limit_exceeded: bool,
    pub remaining_amount: Decimal,
}

/// Pre-stake violation raised by the max-bet check.
#[derive(Debug, Error)]
pub enum RiskViolation {
    #[error("stake {stake} exceeds max {max} ({pct}% of balance)")]
    StakeTooLarge {
        stake: Decimal,
        max: Decimal,
        pct: Decimal,
    },
}

/// Signed loss contribution of one ledger entry, as a positive magnitude.
/// Losses and withdrawals count in full; adjustments count only when they
/// debit the balance. Pending-bet exposure never appears in the ledger, so
/// only realized losses are summed.
fn loss_magnitude(tx: &Transaction) -> Decimal {
    match tx.tx_type {
        TransactionType::Loss | TransactionType::Withdrawal => tx.amount,
        TransactionType::Adjustment if tx.amount < Decimal::ZERO => -tx.amount,
        _ => Decimal::ZERO,
    }
}

/// Evaluate realized losses inside the trailing window against the
/// bankroll's configured percentage limit.
///
/// The limit is a fraction of the balance *now*, not the balance at window
/// start, so it tracks the bankroll's current size. An unset percentage
/// (or a limit that computes to zero) never trips the check.
pub fn check_loss_limit(
    bankroll: &Bankroll,
    transactions: &[Transaction],
    window: LossWindow,
    now: DateTime<Utc>,
) -> LossLimitCheck {
    let window_start = window.start(now);

    let current_loss: Decimal = transactions
        .iter()
        .filter(|tx| tx.created_at >= window_start && tx.created_at < now)
        .map(loss_magnitude)
        .sum();

    let limit = match window.limit_pct(bankroll) {
        Some(pct) => pct * current_balance(bankroll, transactions),
        None => Decimal::ZERO,
    };

    let limit_exceeded = !limit.is_zero() && current_loss > limit;
    let remaining_amount = (limit - current_loss).max(Decimal::ZERO);

    if limit_exceeded {
        tracing::warn!(
            bankroll_id = %bankroll.id,
            window = ?window,
            current_loss = %current_loss,
            limit = %limit,
            "Loss limit exceeded"
        );
    }

    LossLimitCheck {
        window,
        window_start,
        current_loss,
        limit,
        limit_exceeded,
        remaining_amount,
    }
}

/// Enforce the bankroll's max-bet percentage against a proposed stake.
pub fn check_max_bet(
    stake: Decimal,
    bankroll: &Bankroll,
    balance: Decimal,
) -> Result<(), RiskViolation> {
    let max = bankroll.max_bet_pct * balance;
    if stake > max {
        return Err(RiskViolation::StakeTooLarge {
            stake,
            max,
            pct: bankroll.max_bet_pct * Decimal::ONE_HUNDRED,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn bankroll(daily: Option<Decimal>, weekly: Option<Decimal>) -> Bankroll {
        Bankroll {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "test".into(),
            currency: "USD".into(),
            starting_balance: Decimal::from(1000),
            unit_mode: crate::models::UnitMode::Fixed,
            unit_value: Decimal::from(10),
            max_bet_pct: Decimal::new(5, 2),
            daily_loss_limit_pct: daily,
            weekly_loss_limit_pct: weekly,
            kelly_fraction: Decimal::new(25, 2),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn tx(
        bankroll_id: Uuid,
        seq: i64,
        tx_type: TransactionType,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            bankroll_id,
            seq,
            tx_type,
            amount,
            reason: None,
            ref_bet_id: None,
            created_at: at,
        }
    }

    #[test]
    fn test_daily_window_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 17, 45, 9).unwrap();
        let start = LossWindow::Daily.start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weekly_window_starts_monday_midnight() {
        // 2024-03-14 is a Thursday; most recent Monday is 2024-03-11
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 17, 45, 9).unwrap();
        let start = LossWindow::Weekly.start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());

        // On a Monday the window starts that same midnight
        let monday = Utc.with_ymd_and_hms(2024, 3, 11, 2, 0, 0).unwrap();
        assert_eq!(
            LossWindow::Weekly.start(monday),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_no_losses_in_window_not_exceeded() {
        let br = bankroll(Some(Decimal::new(10, 2)), None);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
        // Profit today, loss yesterday (outside daily window)
        let txs = vec![
            tx(br.id, 1, TransactionType::Loss, Decimal::from(80),
               Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap()),
            tx(br.id, 2, TransactionType::Profit, Decimal::from(40),
               Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()),
        ];
        let check = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        assert_eq!(check.current_loss, Decimal::ZERO);
        assert!(!check.limit_exceeded);
        assert_eq!(check.remaining_amount, check.limit);
    }

    #[test]
    fn test_two_losses_trip_daily_limit() {
        // Starting 1000, 10% daily limit; two $60 losses same day.
        // Balance after losses = 880, limit = 88, loss = 120 → exceeded.
        let br = bankroll(Some(Decimal::new(10, 2)), None);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let txs = vec![
            tx(br.id, 1, TransactionType::Loss, Decimal::from(60),
               Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap()),
            tx(br.id, 2, TransactionType::Loss, Decimal::from(60),
               Utc.with_ymd_and_hms(2024, 3, 14, 11, 0, 0).unwrap()),
        ];
        let check = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        assert_eq!(check.current_loss, Decimal::from(120));
        assert!(check.limit_exceeded);
        assert_eq!(check.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn test_unset_limit_never_exceeded() {
        let br = bankroll(None, None);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let txs = vec![tx(
            br.id, 1, TransactionType::Loss, Decimal::from(900),
            Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap(),
        )];
        let check = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        assert_eq!(check.limit, Decimal::ZERO);
        assert!(!check.limit_exceeded);
    }

    #[test]
    fn test_withdrawal_and_negative_adjustment_count() {
        let br = bankroll(Some(Decimal::new(20, 2)), None);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let txs = vec![
            tx(br.id, 1, TransactionType::Withdrawal, Decimal::from(50), at),
            tx(br.id, 2, TransactionType::Adjustment, Decimal::from(-25), at),
            tx(br.id, 3, TransactionType::Deposit, Decimal::from(500), at),
        ];
        let check = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        assert_eq!(check.current_loss, Decimal::from(75));
    }

    #[test]
    fn test_weekly_window_catches_earlier_losses() {
        let br = bankroll(None, Some(Decimal::new(15, 2)));
        // Thursday; loss happened Tuesday, inside the weekly window
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let txs = vec![tx(
            br.id, 1, TransactionType::Loss, Decimal::from(100),
            Utc.with_ymd_and_hms(2024, 3, 12, 10, 0, 0).unwrap(),
        )];
        let daily = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        let weekly = check_loss_limit(&br, &txs, LossWindow::Weekly, now);
        assert_eq!(daily.current_loss, Decimal::ZERO);
        assert_eq!(weekly.current_loss, Decimal::from(100));
    }

    #[test]
    fn test_limit_tracks_current_balance() {
        // 10% of the *current* balance: deposit grows the allowance
        let br = bankroll(Some(Decimal::new(10, 2)), None);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let txs = vec![tx(
            br.id, 1, TransactionType::Deposit, Decimal::from(1000),
            Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap(),
        )];
        let check = check_loss_limit(&br, &txs, LossWindow::Daily, now);
        assert_eq!(check.limit, Decimal::from(200)); // 10% of 2000
    }

    #[test]
    fn test_max_bet_check() {
        let br = bankroll(None, None);
        let balance = Decimal::from(1000);
        assert!(check_max_bet(Decimal::from(50), &br, balance).is_ok());
        assert!(matches!(
            check_max_bet(Decimal::from(51), &br, balance),
            Err(RiskViolation::StakeTooLarge { .. })
        ));
    }
}
