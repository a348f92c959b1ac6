use serde::{Deserialize, Serialize};

use super::chart::{HistorySeries, PieSlice};
use super::symbol::Symbol;

/// USD value of one held currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValue {
    pub symbol: Symbol,

    /// Amount held
    pub amount: f64,

    /// USD unit price used (live or fallback)
    pub price_usd: f64,

    /// `amount × price_usd`
    pub value_usd: f64,
}

/// USD value of the whole wallet at the time of the lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletValuation {
    /// One entry per supported symbol, zero balances included
    pub holdings: Vec<HoldingValue>,

    /// Sum of every holding's value
    pub total_usd: f64,
}

impl WalletValuation {
    pub fn get(&self, symbol: Symbol) -> Option<&HoldingValue> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }
}

/// Everything the summary (chart) view needs, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    /// Balance lines built from the full log
    pub history: HistorySeries,

    /// Current-holdings pie; empty when the wallet holds nothing
    pub pie: Vec<PieSlice>,

    /// Latest per-currency totals priced in USD
    pub valuation: WalletValuation,
}
