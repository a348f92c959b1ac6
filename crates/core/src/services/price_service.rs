use crate::models::price::FallbackPrices;
use crate::models::settings::WalletSettings;
use crate::providers::coinbase::CoinbaseProvider;
use crate::providers::traits::PriceProvider;

/// Live USD prices with a static safety net.
///
/// Every lookup goes straight to the provider: no caching, no retries, no
/// de-duplication of concurrent requests. Lookups take `&self`, so several
/// can be in flight at once and each resolves independently; whichever a
/// caller stores last wins.
///
/// Failures of any kind (transport, HTTP status, malformed body) are never
/// surfaced: the caller gets the fallback price for the symbol instead.
pub struct PriceService {
    provider: Box<dyn PriceProvider>,
    fallback: FallbackPrices,
}

impl PriceService {
    pub fn new(provider: Box<dyn PriceProvider>, fallback: FallbackPrices) -> Self {
        Self { provider, fallback }
    }

    /// Coinbase-backed service configured from wallet settings.
    pub fn from_settings(settings: &WalletSettings) -> Self {
        let provider =
            CoinbaseProvider::with_base_url(&settings.price_api_url, settings.request_timeout_secs);
        Self::new(Box::new(provider), settings.fallback_prices.clone())
    }

    /// Name of the live provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn fallback_prices(&self) -> &FallbackPrices {
        &self.fallback
    }

    /// Latest USD unit price of `symbol`; always a usable number.
    pub async fn last_price_usd(&self, symbol: &str) -> f64 {
        match self.provider.get_usd_price(symbol).await {
            Ok(price) if price.is_finite() && price >= 0.0 => {
                tracing::debug!(symbol, price, provider = self.provider.name(), "fetched price");
                price
            }
            Ok(price) => {
                let fallback = self.fallback.get(symbol);
                tracing::warn!(
                    symbol,
                    price,
                    fallback,
                    provider = self.provider.name(),
                    "invalid price from provider, using fallback"
                );
                fallback
            }
            Err(e) => {
                let fallback = self.fallback.get(symbol);
                tracing::warn!(
                    symbol,
                    fallback,
                    provider = self.provider.name(),
                    error = %e,
                    "price lookup failed, using fallback"
                );
                fallback
            }
        }
    }
}
