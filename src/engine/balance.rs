use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Bankroll, Transaction};

/// One point of the balance-history series: the balance after applying the
/// entry that landed at `timestamp`, and the signed delta it contributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancePoint {
    pub timestamp: DateTime<Utc>,
    pub balance: Decimal,
    pub delta: Decimal,
}

/// Fold the ledger into the current balance:
/// starting_balance + Σ signed(amount).
pub fn current_balance(bankroll: &Bankroll, transactions: &[Transaction]) -> Decimal {
    bankroll.starting_balance
        + transactions
            .iter()
            .map(Transaction::signed_amount)
            .sum::<Decimal>()
}

/// Running fold over the ledger sorted ascending by (created_at, seq),
/// one point per transaction. An empty ledger yields a single point at
/// bankroll-creation time carrying the starting balance.
///
/// The seq tiebreak makes the series deterministic when entries share a
/// timestamp, which the drawdown tracker depends on.
pub fn balance_history(bankroll: &Bankroll, transactions: &[Transaction]) -> Vec<BalancePoint> {
    if transactions.is_empty() {
        return vec![BalancePoint {
            timestamp: bankroll.created_at,
            balance: bankroll.starting_balance,
            delta: Decimal::ZERO,
        }];
    }

    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| (tx.created_at, tx.seq));

    let mut balance = bankroll.starting_balance;
    ordered
        .into_iter()
        .map(|tx| {
            let delta = tx.signed_amount();
            balance += delta;
            BalancePoint {
                timestamp: tx.created_at,
                balance,
                delta,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
