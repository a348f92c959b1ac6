use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A currency the wallet can hold.
///
/// The set is closed. Declaration order is the canonical order used
/// everywhere a deterministic iteration is needed (balances, chart series,
/// pie slices): BTC first, then ETH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
}

impl Symbol {
    /// Every supported symbol, in canonical order.
    pub const ALL: [Symbol; 2] = [Symbol::Btc, Symbol::Eth];

    /// Upper-case ticker, also used as the persisted balance key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Eth => "ETH",
        }
    }

    /// Position in [`Symbol::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Symbol::Btc => 0,
            Symbol::Eth => 1,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Btc => "Bitcoin",
            Symbol::Eth => "Ethereum",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Symbol::Btc),
            "ETH" => Ok(Symbol::Eth),
            _ => Err(CoreError::UnsupportedSymbol(s.to_string())),
        }
    }
}
