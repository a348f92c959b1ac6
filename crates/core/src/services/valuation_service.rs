use std::collections::BTreeMap;

use crate::models::symbol::Symbol;
use crate::models::valuation::{HoldingValue, WalletValuation};
use super::price_service::PriceService;

/// Prices wallet amounts in USD.
///
/// Prices come from [`PriceService`], which never fails, so neither do these
/// conversions. Lookups run one after another, BTC before ETH.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// USD value of `amount` units of `symbol`.
    pub async fn value_of(
        &self,
        price_service: &PriceService,
        symbol: Symbol,
        amount: f64,
    ) -> HoldingValue {
        let price_usd = price_service.last_price_usd(symbol.as_str()).await;
        HoldingValue {
            symbol,
            amount,
            price_usd,
            value_usd: amount * price_usd,
        }
    }

    /// USD value of every supported symbol; symbols missing from `amounts`
    /// are valued at 0 units.
    pub async fn wallet_value(
        &self,
        price_service: &PriceService,
        amounts: &BTreeMap<Symbol, f64>,
    ) -> WalletValuation {
        let mut holdings = Vec::with_capacity(Symbol::ALL.len());
        for symbol in Symbol::ALL {
            let amount = amounts.get(&symbol).copied().unwrap_or(0.0);
            holdings.push(self.value_of(price_service, symbol, amount).await);
        }
        let total_usd = holdings.iter().map(|h| h.value_usd).sum();
        WalletValuation {
            holdings,
            total_usd,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a USD amount en-US style: `$1,234.50`, `-$12`.
pub fn format_usd(value: f64, fraction_digits: usize) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let fixed = format!("{:.*}", fraction_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // No sign when rounding leaves only zeros.
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}
