pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    chart::{HistorySeries, PieSlice},
    settings::WalletSettings,
    symbol::Symbol,
    transaction::TransactionRecord,
    valuation::{HoldingValue, WalletSummary, WalletValuation},
};
use services::{
    chart_service::ChartService,
    ledger_service::{validate_amount, LedgerStore},
    price_service::PriceService,
    valuation_service::ValuationService,
};
use std::collections::BTreeMap;
use storage::kv::KeyValueStore;

use errors::CoreError;

/// Main entry point for the Virtual Wallet core library.
///
/// This is the action surface a front end drives: it validates user input,
/// refuses removals larger than the balance, and then delegates to the
/// ledger, chart, and valuation services.
#[must_use]
pub struct VirtualWallet<S: KeyValueStore> {
    ledger: LedgerStore<S>,
    price_service: PriceService,
    chart_service: ChartService,
    valuation_service: ValuationService,
}

impl<S: KeyValueStore> std::fmt::Debug for VirtualWallet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualWallet")
            .field("balances", &self.ledger.total_balances().ok())
            .field("price_provider", &self.price_service.provider_name())
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl VirtualWallet<storage::file::FileStore> {
    /// Open (or create) a wallet persisted in a JSON file on disk.
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        settings: &WalletSettings,
    ) -> Result<Self, CoreError> {
        let store = storage::file::FileStore::open(path)?;
        Self::open(store, settings)
    }
}

impl<S: KeyValueStore> VirtualWallet<S> {
    /// Open a wallet over `store`, initializing missing balances and logs.
    pub fn open(store: S, settings: &WalletSettings) -> Result<Self, CoreError> {
        Self::with_price_service(store, PriceService::from_settings(settings))
    }

    /// Open a wallet with a caller-supplied price service.
    pub fn with_price_service(store: S, price_service: PriceService) -> Result<Self, CoreError> {
        Ok(Self {
            ledger: LedgerStore::open(store)?,
            price_service,
            chart_service: ChartService::new(),
            valuation_service: ValuationService::new(),
        })
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Add `amount` of `symbol` to the wallet.
    pub fn add(&mut self, symbol: Symbol, amount: f64) -> Result<TransactionRecord, CoreError> {
        validate_amount(amount)?;
        self.ledger.add(symbol, amount)
    }

    /// Remove `amount` of `symbol` from the wallet.
    /// Fails with `InsufficientBalance` when `amount` exceeds the balance.
    pub fn remove(&mut self, symbol: Symbol, amount: f64) -> Result<TransactionRecord, CoreError> {
        validate_amount(amount)?;
        let available = self.ledger.balance(symbol)?;
        if amount > available {
            return Err(CoreError::InsufficientBalance {
                symbol: symbol.to_string(),
                requested: amount,
                available,
            });
        }
        self.ledger.remove(symbol, amount)
    }

    // ── Balances & History ──────────────────────────────────────────

    /// Balance of one symbol (0 when never touched).
    pub fn balance(&self, symbol: Symbol) -> Result<f64, CoreError> {
        self.ledger.balance(symbol)
    }

    /// Every symbol with a positive balance.
    pub fn balances(&self) -> Result<BTreeMap<Symbol, f64>, CoreError> {
        self.ledger.total_balances()
    }

    /// Human-readable history, newest-first.
    pub fn history(&self) -> Result<Vec<String>, CoreError> {
        self.ledger.short_log()
    }

    /// Delete one history line (0 = newest). Out-of-range indices are ignored.
    pub fn delete_history_item(&mut self, index: usize) -> Result<bool, CoreError> {
        self.ledger.delete_short_log_entry(index)
    }

    /// Structured transaction log, oldest-first.
    pub fn full_history(&self) -> Result<Vec<TransactionRecord>, CoreError> {
        self.ledger.full_log()
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Balance lines for every symbol.
    pub fn history_series(&self) -> Result<HistorySeries, CoreError> {
        let log = self.ledger.full_log()?;
        Ok(self.chart_service.build_series(&log))
    }

    /// Current-holdings pie; empty when the wallet is empty.
    pub fn pie_chart(&self) -> Result<Vec<PieSlice>, CoreError> {
        let balances = self.ledger.total_balances()?;
        Ok(self.chart_service.pie_proportions(&balances))
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// USD value of an arbitrary amount of `symbol`.
    pub async fn check_amount_usd(
        &self,
        symbol: Symbol,
        amount: f64,
    ) -> Result<HoldingValue, CoreError> {
        validate_amount(amount)?;
        Ok(self
            .valuation_service
            .value_of(&self.price_service, symbol, amount)
            .await)
    }

    /// USD value of the whole wallet.
    pub async fn wallet_value(&self) -> Result<WalletValuation, CoreError> {
        let balances = self.ledger.total_balances()?;
        Ok(self
            .valuation_service
            .wallet_value(&self.price_service, &balances)
            .await)
    }

    /// Everything the summary view shows: balance lines, the holdings pie,
    /// and the latest totals priced in USD.
    ///
    /// The pie and the prices use the latest total of each balance line.
    pub async fn summary(&self) -> Result<WalletSummary, CoreError> {
        let history = self.history_series()?;
        let latest: BTreeMap<Symbol, f64> = history
            .series
            .iter()
            .map(|s| (s.symbol, s.latest_total()))
            .collect();

        let pie = self.chart_service.pie_proportions(&latest);
        let valuation = self
            .valuation_service
            .wallet_value(&self.price_service, &latest)
            .await;

        Ok(WalletSummary {
            history,
            pie,
            valuation,
        })
    }

    // ── Internal access ─────────────────────────────────────────────

    /// Borrow the ledger (read-only).
    pub fn ledger(&self) -> &LedgerStore<S> {
        &self.ledger
    }

    /// Close the wallet and give back its store.
    pub fn into_store(self) -> S {
        self.ledger.into_store()
    }
}

/// Parse a user-entered amount.
///
/// Like a browser number field read with `parseFloat`: leading whitespace is
/// skipped and the longest numeric prefix is used (`"2.5 BTC"` → 2.5). The
/// result must be finite and greater than zero.
pub fn parse_amount(input: &str) -> Result<f64, CoreError> {
    let invalid = || CoreError::ValidationError(format!("Please enter a valid amount: '{input}'"));

    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return Err(invalid());
    }
    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let value: f64 = s[..end].parse().map_err(|_| invalid())?;
    validate_amount(value).map_err(|_| invalid())?;
    Ok(value)
}
