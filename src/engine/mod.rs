pub mod analytics;
pub mod balance;
pub mod drawdown;
pub mod goal;
pub mod kelly;
pub mod risk;
pub mod units;

pub use analytics::{analyze, BetAnalytics, CategoryProfit, DateRange};
pub use balance::{balance_history, current_balance, BalancePoint};
pub use drawdown::{drawdown_stats, DrawdownStats};
pub use goal::{evaluate_goal, GoalEvaluation};
pub use kelly::{kelly, KellyInputError, KellyRecommendation};
pub use risk::{check_loss_limit, check_max_bet, LossLimitCheck, LossWindow, RiskViolation};
pub use units::{stake_to_units, units_to_stake, UnitError};
