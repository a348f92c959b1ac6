use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Display format for transaction timestamps (short log text and chart labels).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Direction of a ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Added,
    Removed,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Added => write!(f, "Added"),
            TransactionKind::Removed => write!(f, "Removed"),
        }
    }
}

/// One entry of the structured (full) transaction log.
///
/// Field names match the persisted JSON layout of the
/// `transactionHistoryFull` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Currency the movement applies to
    pub currency: Symbol,

    /// Signed movement: positive for additions, negative for removals
    pub amount: f64,

    /// Balance of `currency` after this movement
    pub total: f64,

    /// Local wall-clock time of the movement, whole seconds
    pub date: NaiveDateTime,
}

impl TransactionRecord {
    pub fn new(currency: Symbol, amount: f64, total: f64, date: NaiveDateTime) -> Self {
        Self {
            currency,
            amount,
            total,
            date,
        }
    }

    /// The timestamp as shown in the short log and on chart axes.
    pub fn label(&self) -> String {
        self.date.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Render a short-log line, e.g. `"Added 2 BTC on 2025-01-15 10:30:00"`.
pub fn short_log_line(
    kind: TransactionKind,
    amount: f64,
    symbol: Symbol,
    date: NaiveDateTime,
) -> String {
    format!("{kind} {amount} {symbol} on {}", date.format(TIMESTAMP_FORMAT))
}
