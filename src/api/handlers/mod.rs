pub mod analytics;
pub mod bankrolls;
pub mod bets;
pub mod goals;
pub mod health;
pub mod kelly;
pub mod metrics;
pub mod risk;
pub mod transactions;
