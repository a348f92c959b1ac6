use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::symbol::Symbol;
use crate::models::transaction::{short_log_line, TransactionKind, TransactionRecord};
use crate::storage::keys::{EMPTY_LOG, FULL_LOG_KEY, SHORT_LOG_KEY, ZERO_BALANCE};
use crate::storage::kv::KeyValueStore;

/// Owns every read and write of the wallet's persisted keys.
///
/// State lives entirely in the underlying [`KeyValueStore`]:
/// - one stringified balance per symbol (`"BTC"`, `"ETH"`),
/// - the short log (`"history"`): display strings, newest-first,
/// - the full log (`"transactionHistoryFull"`): structured records, oldest-first.
///
/// Mutations take `&mut self`; there is no internal locking.
pub struct LedgerStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Open a ledger over `store`, writing a zero balance for every symbol
    /// and an empty array for every log that is not present yet.
    pub fn open(mut store: S) -> Result<Self, CoreError> {
        for symbol in Symbol::ALL {
            if !store.contains(symbol.as_str())? {
                store.set(symbol.as_str(), ZERO_BALANCE.to_string())?;
            }
        }
        for key in [SHORT_LOG_KEY, FULL_LOG_KEY] {
            if !store.contains(key)? {
                store.set(key, EMPTY_LOG.to_string())?;
            }
        }
        tracing::debug!("ledger store initialized");
        Ok(Self { store })
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Credit `amount` of `symbol`, timestamped now.
    pub fn add(&mut self, symbol: Symbol, amount: f64) -> Result<TransactionRecord, CoreError> {
        self.add_at(symbol, amount, now())
    }

    /// Credit `amount` of `symbol` at an explicit timestamp.
    pub fn add_at(
        &mut self,
        symbol: Symbol,
        amount: f64,
        date: NaiveDateTime,
    ) -> Result<TransactionRecord, CoreError> {
        validate_amount(amount)?;

        let total = self.balance(symbol)? + amount;
        let record = TransactionRecord::new(symbol, amount, total, date);
        self.commit(
            &record,
            short_log_line(TransactionKind::Added, amount, symbol, date),
        )?;

        tracing::debug!(%symbol, amount, total, "added to wallet");
        Ok(record)
    }

    /// Debit `amount` of `symbol`, timestamped now.
    pub fn remove(&mut self, symbol: Symbol, amount: f64) -> Result<TransactionRecord, CoreError> {
        self.remove_at(symbol, amount, now())
    }

    /// Debit `amount` of `symbol` at an explicit timestamp.
    ///
    /// Removing more than the balance floors it at zero instead of failing.
    /// The short log keeps the requested amount; the full log records the
    /// delta actually applied, so running sums of `amount` always match
    /// `total`.
    pub fn remove_at(
        &mut self,
        symbol: Symbol,
        amount: f64,
        date: NaiveDateTime,
    ) -> Result<TransactionRecord, CoreError> {
        validate_amount(amount)?;

        let current = self.balance(symbol)?;
        let clamped = amount > current;
        let (total, applied) = if clamped {
            (0.0, 0.0 - current)
        } else {
            (current - amount, -amount)
        };
        let record = TransactionRecord::new(symbol, applied, total, date);
        self.commit(
            &record,
            short_log_line(TransactionKind::Removed, amount, symbol, date),
        )?;

        if clamped {
            tracing::debug!(%symbol, requested = amount, applied, "removal clamped at zero");
        }
        tracing::debug!(%symbol, amount = applied, total, "removed from wallet");
        Ok(record)
    }

    /// Delete one short-log entry (0 = newest).
    ///
    /// Returns `false` and leaves the log untouched when `index` is out of
    /// range. The full log is never affected.
    pub fn delete_short_log_entry(&mut self, index: usize) -> Result<bool, CoreError> {
        let mut log = self.short_log()?;
        if index >= log.len() {
            return Ok(false);
        }
        log.remove(index);
        self.write_json(SHORT_LOG_KEY, &log)?;
        tracing::debug!(index, remaining = log.len(), "deleted short log entry");
        Ok(true)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Current balance of one symbol. Missing or empty values read as 0.
    pub fn balance(&self, symbol: Symbol) -> Result<f64, CoreError> {
        let key = symbol.as_str();
        let raw = match self.store.get(key)? {
            Some(raw) => raw,
            None => return Ok(0.0),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        let value: f64 = trimmed.parse().map_err(|e| CoreError::CorruptedValue {
            key: key.to_string(),
            message: format!("'{trimmed}' is not a number: {e}"),
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::CorruptedValue {
                key: key.to_string(),
                message: format!("balance must be finite and non-negative, found {value}"),
            });
        }
        Ok(value)
    }

    /// Every symbol with a positive balance, in canonical order.
    /// Zero balances are omitted.
    pub fn total_balances(&self) -> Result<BTreeMap<Symbol, f64>, CoreError> {
        let mut balances = BTreeMap::new();
        for symbol in Symbol::ALL {
            let amount = self.balance(symbol)?;
            if amount > 0.0 {
                balances.insert(symbol, amount);
            }
        }
        Ok(balances)
    }

    /// The short log, newest-first.
    pub fn short_log(&self) -> Result<Vec<String>, CoreError> {
        self.read_json(SHORT_LOG_KEY)
    }

    /// The full log, oldest-first.
    pub fn full_log(&self) -> Result<Vec<TransactionRecord>, CoreError> {
        self.read_json(FULL_LOG_KEY)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Persist one mutation: the new balance, the short-log line and the
    /// full-log record. Both logs are parsed and serialized before the first
    /// write, so a corrupted log fails the call with nothing stored.
    fn commit(&mut self, record: &TransactionRecord, line: String) -> Result<(), CoreError> {
        let mut short = self.short_log()?;
        let mut full = self.full_log()?;
        short.insert(0, line);
        full.push(record.clone());

        let short_json = to_json(SHORT_LOG_KEY, &short)?;
        let full_json = to_json(FULL_LOG_KEY, &full)?;

        self.store
            .set(record.currency.as_str(), record.total.to_string())?;
        self.store.set(SHORT_LOG_KEY, short_json)?;
        self.store.set(FULL_LOG_KEY, full_json)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, CoreError> {
        match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|e| CoreError::CorruptedValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    fn write_json<T: serde::Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), CoreError> {
        let json = to_json(key, items)?;
        self.store.set(key, json)
    }
}

fn to_json<T: serde::Serialize>(key: &str, items: &[T]) -> Result<String, CoreError> {
    serde_json::to_string(items)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize '{key}': {e}")))
}

/// Reject amounts that are not finite or not strictly positive.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Amount must be a finite number greater than zero, got {amount}"
        )));
    }
    Ok(())
}

/// Local wall-clock time, truncated to whole seconds.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
