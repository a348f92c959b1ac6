//! Names of the persisted keys.
//!
//! Balances are stored under the symbol itself (`"BTC"`, `"ETH"`);
//! see [`crate::models::symbol::Symbol::as_str`].

/// JSON array of short-log strings, newest-first.
pub const SHORT_LOG_KEY: &str = "history";

/// JSON array of [`crate::models::transaction::TransactionRecord`], oldest-first.
pub const FULL_LOG_KEY: &str = "transactionHistoryFull";

/// Value written for a balance that has never been touched.
pub const ZERO_BALANCE: &str = "0";

/// Value written for a log that has never been touched.
pub const EMPTY_LOG: &str = "[]";
