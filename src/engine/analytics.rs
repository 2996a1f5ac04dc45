use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Bankroll, Bet, BetStatus};

/// Optional inclusive settlement-date filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if at > to {
                return false;
            }
        }
        true
    }
}

/// Profit summed within one category of bets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryProfit {
    pub category: String,
    pub profit: Decimal,
    pub count: i64,
}

/// Aggregates over the settled-bet set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetAnalytics {
    pub total_bets: i64,
    pub winning_bets: i64,
    pub losing_bets: i64,
    /// winning / (winning + losing) · 100; zero with no settled bets.
    pub win_rate: Decimal,
    pub net_profit: Decimal,
    /// Net profit as a percentage of the starting balance.
    pub net_profit_percent: Decimal,
    /// Average profit of winning bets (positive magnitude).
    pub avg_win_amount: Decimal,
    /// Average stake lost on losing bets (positive magnitude).
    pub avg_loss_amount: Decimal,
    pub avg_bet_size: Decimal,
    /// Average of the frozen per-bet unit counts, not recomputed against
    /// any later balance.
    pub avg_bet_size_units: Decimal,
    pub profit_by_type: Vec<CategoryProfit>,
}

fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Aggregate all settled bets inside the optional date range. Every divide
/// is guarded: an empty set is an expected steady state, never NaN.
///
/// Categories come from the caller-supplied key function; the API layer
/// passes the bet's type field.
pub fn analyze<F>(
    bankroll: &Bankroll,
    bets: &[Bet],
    range: DateRange,
    category_key: F,
) -> BetAnalytics
where
    F: Fn(&Bet) -> String,
{
    // A settled row missing its timestamp (imported data) cannot be placed
    // inside a bounded range, so it is excluded rather than sneaking in.
    let settled: Vec<&Bet> = bets
        .iter()
        .filter(|b| b.status.is_settled())
        .filter(|b| match b.settled_at {
            Some(at) => range.contains(at),
            None => !range.is_bounded(),
        })
        .collect();

    let winners: Vec<&Bet> = settled
        .iter()
        .copied()
        .filter(|b| b.status == BetStatus::Won)
        .collect();
    let losers: Vec<&Bet> = settled
        .iter()
        .copied()
        .filter(|b| b.status == BetStatus::Lost)
        .collect();

    let total_bets = settled.len() as i64;
    let winning_bets = winners.len() as i64;
    let losing_bets = losers.len() as i64;

    let win_rate = ratio_or_zero(
        Decimal::from(winning_bets),
        Decimal::from(winning_bets + losing_bets),
    ) * Decimal::ONE_HUNDRED;

    let won_profit: Decimal = winners.iter().map(|b| b.realized_profit()).sum();
    let lost_stake: Decimal = losers.iter().map(|b| b.stake).sum();
    let net_profit = won_profit - lost_stake;
    let net_profit_percent =
        ratio_or_zero(net_profit, bankroll.starting_balance) * Decimal::ONE_HUNDRED;

    let avg_win_amount = ratio_or_zero(won_profit, Decimal::from(winning_bets));
    let avg_loss_amount = ratio_or_zero(lost_stake, Decimal::from(losing_bets));

    let total_stake: Decimal = settled.iter().map(|b| b.stake).sum();
    let total_units: Decimal = settled.iter().map(|b| b.stake_units).sum();
    let avg_bet_size = ratio_or_zero(total_stake, Decimal::from(total_bets));
    let avg_bet_size_units = ratio_or_zero(total_units, Decimal::from(total_bets));

    // BTreeMap keeps category output ordering stable across runs.
    let mut by_type: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    for bet in &settled {
        let entry = by_type
            .entry(category_key(bet))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += bet.realized_profit();
        entry.1 += 1;
    }
    let profit_by_type = by_type
        .into_iter()
        .map(|(category, (profit, count))| CategoryProfit {
            category,
            profit,
            count,
        })
        .collect();

    BetAnalytics {
        total_bets,
        winning_bets,
        losing_bets,
        win_rate,
        net_profit,
        net_profit_percent,
        avg_win_amount,
        avg_loss_amount,
        avg_bet_size,
        avg_bet_size_units,
        profit_by_type,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitMode;
    use chrono::Duration;
    use uuid::Uuid;

    fn bankroll() -> Bankroll {
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
            kelly_fraction: Decimal::new(25, 2),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn bet(
        bankroll_id: Uuid,
        bet_type: &str,
        stake: i64,
        status: BetStatus,
        actual_payout: Option<i64>,
    ) -> Bet {
        let stake = Decimal::from(stake);
        Bet {
            id: Uuid::new_v4(),
            bankroll_id,
            bet_type: Some(bet_type.into()),
            stake,
            stake_units: stake / Decimal::from(10),
            potential_payout: stake * Decimal::from(2),
            actual_payout: actual_payout.map(Decimal::from),
            status,
            placed_at: Utc::now(),
            settled_at: status.is_settled().then(Utc::now),
        }
    }

    fn key(b: &Bet) -> String {
        b.bet_type.clone().unwrap_or_else(|| "uncategorized".into())
    }

    #[test]
    fn test_empty_set_all_zeroes() {
        let br = bankroll();
        let a = analyze(&br, &[], DateRange::default(), key);
        assert_eq!(a.total_bets, 0);
        assert_eq!(a.win_rate, Decimal::ZERO);
        assert_eq!(a.net_profit, Decimal::ZERO);
        assert_eq!(a.avg_win_amount, Decimal::ZERO);
        assert_eq!(a.avg_loss_amount, Decimal::ZERO);
        assert_eq!(a.avg_bet_size, Decimal::ZERO);
        assert!(a.profit_by_type.is_empty());
    }

    #[test]
    fn test_pending_bets_excluded() {
        let br = bankroll();
        let bets = vec![
            bet(br.id, "spread", 50, BetStatus::Pending, None),
            bet(br.id, "spread", 50, BetStatus::Won, Some(125)),
        ];
        let a = analyze(&br, &bets, DateRange::default(), key);
        assert_eq!(a.total_bets, 1);
        assert_eq!(a.winning_bets, 1);
    }

    #[test]
    fn test_single_win_scenario() {
        // $50 stake won at $125 payout → profit 75, win rate 100
        let br = bankroll();
        let bets = vec![bet(br.id, "moneyline", 50, BetStatus::Won, Some(125))];
        let a = analyze(&br, &bets, DateRange::default(), key);
        assert_eq!(a.net_profit, Decimal::from(75));
        assert_eq!(a.win_rate, Decimal::from(100));
        assert_eq!(a.net_profit_percent, Decimal::new(75, 1)); // 7.5%
        assert_eq!(a.avg_win_amount, Decimal::from(75));
        assert_eq!(a.avg_loss_amount, Decimal::ZERO);
    }

    #[test]
    fn test_mixed_results() {
        let br = bankroll();
        let bets = vec![
            bet(br.id, "spread", 100, BetStatus::Won, Some(190)),
            bet(br.id, "spread", 100, BetStatus::Lost, None),
            bet(br.id, "total", 50, BetStatus::Won, Some(140)),
            bet(br.id, "total", 50, BetStatus::Lost, None),
        ];
        let a = analyze(&br, &bets, DateRange::default(), key);
        assert_eq!(a.total_bets, 4);
        assert_eq!(a.win_rate, Decimal::from(50));
        // (90 + 90) - (100 + 50) = 30
        assert_eq!(a.net_profit, Decimal::from(30));
        assert_eq!(a.avg_win_amount, Decimal::from(90));
        assert_eq!(a.avg_loss_amount, Decimal::from(75));
        assert_eq!(a.avg_bet_size, Decimal::from(75));
        assert_eq!(a.avg_bet_size_units, Decimal::new(75, 1));
    }

    #[test]
    fn test_profit_by_category() {
        let br = bankroll();
        let bets = vec![
            bet(br.id, "spread", 100, BetStatus::Won, Some(190)),
            bet(br.id, "spread", 100, BetStatus::Lost, None),
            bet(br.id, "total", 50, BetStatus::Won, Some(140)),
        ];
        let a = analyze(&br, &bets, DateRange::default(), key);
        assert_eq!(
            a.profit_by_type,
            vec![
                CategoryProfit {
                    category: "spread".into(),
                    profit: Decimal::from(-10),
                    count: 2,
                },
                CategoryProfit {
                    category: "total".into(),
                    profit: Decimal::from(90),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_date_range_filters_on_settlement() {
        let br = bankroll();
        let old = {
            let mut b = bet(br.id, "spread", 50, BetStatus::Won, Some(125));
            b.settled_at = Some(Utc::now() - Duration::days(30));
            b
        };
        let recent = bet(br.id, "spread", 50, BetStatus::Lost, None);
        let range = DateRange {
            from: Some(Utc::now() - Duration::days(7)),
            to: None,
        };
        let a = analyze(&br, &[old, recent], range, key);
        assert_eq!(a.total_bets, 1);
        assert_eq!(a.losing_bets, 1);
    }

    #[test]
    fn test_untimestamped_settled_bet_excluded_from_bounded_range() {
        let br = bankroll();
        let mut imported = bet(br.id, "spread", 50, BetStatus::Won, Some(125));
        imported.settled_at = None;

        // No range: still aggregated
        let all = analyze(&br, std::slice::from_ref(&imported), DateRange::default(), key);
        assert_eq!(all.total_bets, 1);

        // Bounded range: cannot be placed, so excluded
        let range = DateRange {
            from: Some(Utc::now() - Duration::days(7)),
            to: None,
        };
        let ranged = analyze(&br, &[imported], range, key);
        assert_eq!(ranged.total_bets, 0);
    }

    #[test]
    fn test_frozen_units_used_as_recorded() {
        let br = bankroll();
        // Unit counts recorded at two different balances; analytics must
        // average the recorded values, not re-derive them.
        let mut a_bet = bet(br.id, "spread", 40, BetStatus::Won, Some(80));
        a_bet.stake_units = Decimal::from(2);
        let mut b_bet = bet(br.id, "spread", 40, BetStatus::Lost, None);
        b_bet.stake_units = Decimal::from(1);
        let a = analyze(&br, &[a_bet, b_bet], DateRange::default(), key);
        assert_eq!(a.avg_bet_size_units, Decimal::new(15, 1)); // 1.5
    }
}
