use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static USD prices used whenever a live lookup fails.
///
/// Any symbol without an entry is worth 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackPrices {
    /// Upper-case symbol → USD price
    pub prices: HashMap<String, f64>,
}

impl FallbackPrices {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// Fallback price for `symbol` (case-insensitive), 0 when unknown.
    pub fn get(&self, symbol: &str) -> f64 {
        self.prices
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// Override or add a fallback price.
    pub fn set(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_uppercase(), price);
    }
}

impl Default for FallbackPrices {
    fn default() -> Self {
        let mut prices = HashMap::new();
        prices.insert("BTC".to_string(), 45_000.0);
        prices.insert("ETH".to_string(), 3_000.0);
        Self { prices }
    }
}
