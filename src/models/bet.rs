use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{BetStatus, TransactionType};

/// Database row for the bets table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bet {
    pub id: Uuid,
    pub bankroll_id: Uuid,
    /// Free-form category key used by analytics grouping.
    pub bet_type: Option<String>,
    pub stake: Decimal,
    /// Unit count derived from the stake and the bankroll's unit sizing at
    /// placement time. Frozen: never recomputed when the balance moves.
    pub stake_units: Decimal,
    pub potential_payout: Decimal,
    /// Present only once the bet is won.
    pub actual_payout: Option<Decimal>,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    /// Realized profit of a settled bet: payout minus stake when won,
    /// minus the stake when lost, zero while pending.
    pub fn realized_profit(&self) -> Decimal {
        match self.status {
            BetStatus::Won => {
                self.actual_payout.unwrap_or(Decimal::ZERO) - self.stake
            }
            BetStatus::Lost => -self.stake,
            BetStatus::Pending => Decimal::ZERO,
        }
    }

    /// Ledger entry for settling this bet: entry type plus a positive
    /// magnitude. A won bet whose payout falls short of the stake (a
    /// half-win) books the shortfall as a loss entry, so the amount column
    /// stays a magnitude and loss-limit windows see the realized loss.
    /// Returns None while the outcome is pending or a won payout is absent.
    pub fn settlement_entry(
        &self,
        outcome: BetStatus,
        actual_payout: Option<Decimal>,
    ) -> Option<(TransactionType, Decimal)> {
        match outcome {
            BetStatus::Won => actual_payout.map(|payout| {
                if payout >= self.stake {
                    (TransactionType::Profit, payout - self.stake)
                } else {
                    (TransactionType::Loss, self.stake - payout)
                }
            }),
            BetStatus::Lost => Some((TransactionType::Loss, self.stake)),
            BetStatus::Pending => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn bet(stake: i64) -> Bet {
        Bet {
            id: Uuid::new_v4(),
            bankroll_id: Uuid::new_v4(),
            bet_type: None,
            stake: Decimal::from(stake),
            stake_units: Decimal::from(stake) / Decimal::from(10),
            potential_payout: Decimal::from(stake * 2),
            actual_payout: None,
            status: BetStatus::Pending,
            placed_at: Utc::now(),
            settled_at: None,
        }
    }

    #[test]
    fn test_won_settlement_books_profit() {
        let entry = bet(50)
            .settlement_entry(BetStatus::Won, Some(Decimal::from(125)))
            .unwrap();
        assert_eq!(entry, (TransactionType::Profit, Decimal::from(75)));
    }

    #[test]
    fn test_lost_settlement_books_stake_as_loss() {
        let entry = bet(60).settlement_entry(BetStatus::Lost, None).unwrap();
        assert_eq!(entry, (TransactionType::Loss, Decimal::from(60)));
    }

    #[test]
    fn test_half_win_books_shortfall_as_loss() {
        // Payout below stake: the entry is a loss magnitude, never a
        // negative profit amount
        let entry = bet(100)
            .settlement_entry(BetStatus::Won, Some(Decimal::from(40)))
            .unwrap();
        assert_eq!(entry, (TransactionType::Loss, Decimal::from(60)));
    }

    #[test]
    fn test_push_books_zero_profit() {
        let entry = bet(100)
            .settlement_entry(BetStatus::Won, Some(Decimal::from(100)))
            .unwrap();
        assert_eq!(entry, (TransactionType::Profit, Decimal::ZERO));
    }

    #[test]
    fn test_pending_and_missing_payout_yield_nothing() {
        assert_eq!(bet(50).settlement_entry(BetStatus::Pending, None), None);
        assert_eq!(bet(50).settlement_entry(BetStatus::Won, None), None);
    }
}
