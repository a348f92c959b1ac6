use serde::{Deserialize, Serialize};

use super::price::FallbackPrices;

/// Default base URL of the exchange-rate API.
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coinbase.com/v2";

/// Default HTTP timeout for price lookups, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Base URL of the exchange-rate API (no trailing slash needed)
    pub price_api_url: String,

    /// HTTP timeout for a single price lookup. Ignored on WASM.
    pub request_timeout_secs: u64,

    /// Prices used when a live lookup fails
    pub fallback_prices: FallbackPrices,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            fallback_prices: FallbackPrices::default(),
        }
    }
}
