use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::{DEFAULT_PRICE_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::traits::PriceProvider;

const PROVIDER_NAME: &str = "Coinbase";

/// Coinbase exchange-rates API provider.
///
/// - **Free**: No API key required.
/// - **Endpoint**: `GET /exchange-rates?currency={SYMBOL}`
/// - **Response**: `{ "data": { "rates": { "USD": "45123.45", ... } } }`
///
/// Rates come back as decimal strings keyed by quote currency.
pub struct CoinbaseProvider {
    client: Client,
    base_url: String,
}

impl CoinbaseProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_PRICE_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Point the provider at another host (mirrors, local test servers).
    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `symbol`.
    pub fn rates_url(&self, symbol: &str) -> String {
        format!(
            "{}/exchange-rates?currency={}",
            self.base_url,
            symbol.trim().to_uppercase()
        )
    }
}

impl Default for CoinbaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Coinbase API response types ─────────────────────────────────────

#[derive(Deserialize)]
struct ExchangeRatesResponse {
    data: Option<ExchangeRatesData>,
}

#[derive(Deserialize)]
struct ExchangeRatesData {
    rates: Option<Rates>,
}

#[derive(Deserialize)]
struct Rates {
    #[serde(rename = "USD")]
    usd: Option<String>,
}

/// Extract the USD rate from an exchange-rates response body.
///
/// Fails when the body is not JSON, when `data.rates.USD` is missing, or when
/// the rate is not a finite, non-negative number.
pub fn parse_usd_rate(body: &str, symbol: &str) -> Result<f64, CoreError> {
    let resp: ExchangeRatesResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Failed to parse response for {symbol}: {e}"),
    })?;

    let raw = resp
        .data
        .and_then(|d| d.rates)
        .and_then(|r| r.usd)
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("No USD rate for {symbol}"),
        })?;

    let price: f64 = raw.trim().parse().map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Invalid price format for {symbol}: {e}"),
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid price returned for {symbol}: {price}"),
        });
    }

    Ok(price)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for CoinbaseProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_usd_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let url = self.rates_url(symbol);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP error for {symbol}: status {status}"),
            });
        }

        let body = resp.text().await?;
        parse_usd_rate(&body, symbol)
    }
}
