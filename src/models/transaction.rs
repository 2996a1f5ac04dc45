use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TransactionType;

/// Database row for the transactions table — one immutable ledger entry.
///
/// `amount` is stored as a positive magnitude for every type except
/// `adjustment`, which is stored already signed. `seq` is a per-database
/// monotonic counter that breaks ties between entries sharing a
/// `created_at`, so the ledger fold is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub bankroll_id: Uuid,
    pub seq: i64,
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub reason: Option<String>,
    /// Settlement entries (profit/loss) link back to the bet that produced
    /// them; doubles as the idempotency key for settlement.
    pub ref_bet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The entry's signed effect on the balance.
    pub fn signed_amount(&self) -> Decimal {
        self.tx_type.signed(self.amount)
    }
}
