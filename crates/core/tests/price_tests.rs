// ═══════════════════════════════════════════════════════════════════
// Price Tests — fallback table, Coinbase parsing, PriceService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use virtual_wallet_core::errors::CoreError;
use virtual_wallet_core::models::price::FallbackPrices;
use virtual_wallet_core::models::settings::{WalletSettings, DEFAULT_PRICE_API_URL};
use virtual_wallet_core::providers::coinbase::{parse_usd_rate, CoinbaseProvider};
use virtual_wallet_core::providers::traits::PriceProvider;
use virtual_wallet_core::services::price_service::PriceService;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// Returns fixed prices; unknown symbols are an API error.
struct MockProvider {
    prices: HashMap<String, f64>,
}

impl MockProvider {
    fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn get_usd_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.prices.get(symbol).copied().ok_or_else(|| CoreError::Api {
            provider: "Mock".into(),
            message: format!("no price for {symbol}"),
        })
    }
}

/// Always fails with a network error.
struct FailingProvider;

#[async_trait]
impl PriceProvider for FailingProvider {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn get_usd_price(&self, symbol: &str) -> Result<f64, CoreError> {
        Err(CoreError::Network(format!("connection refused for {symbol}")))
    }
}

/// Serve exactly one HTTP response on a local port and return the base URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}/v2")
}

fn coinbase_service(base_url: &str) -> PriceService {
    PriceService::new(
        Box::new(CoinbaseProvider::with_base_url(base_url, 5)),
        FallbackPrices::default(),
    )
}

/// Counts calls and yields once before answering, so concurrent lookups
/// genuinely overlap.
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceProvider for CountingProvider {
    fn name(&self) -> &str {
        "Counting"
    }

    async fn get_usd_price(&self, _symbol: &str) -> Result<f64, CoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(100.0 + n as f64)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fallback prices
// ═══════════════════════════════════════════════════════════════════

mod fallback_prices {
    use super::*;

    #[test]
    fn defaults() {
        let fallback = FallbackPrices::default();
        assert_eq!(fallback.get("BTC"), 45_000.0);
        assert_eq!(fallback.get("ETH"), 3_000.0);
    }

    #[test]
    fn unknown_symbol_is_zero() {
        let fallback = FallbackPrices::default();
        assert_eq!(fallback.get("LTC"), 0.0);
        assert_eq!(fallback.get(""), 0.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let fallback = FallbackPrices::default();
        assert_eq!(fallback.get("btc"), 45_000.0);
    }

    #[test]
    fn override_price() {
        let mut fallback = FallbackPrices::default();
        fallback.set("eth", 2_500.0);
        fallback.set("LTC", 80.0);
        assert_eq!(fallback.get("ETH"), 2_500.0);
        assert_eq!(fallback.get("LTC"), 80.0);
    }

    #[test]
    fn empty_table_prices_everything_at_zero() {
        assert_eq!(FallbackPrices::new().get("BTC"), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Coinbase response parsing
// ═══════════════════════════════════════════════════════════════════

mod coinbase_parsing {
    use super::*;

    #[test]
    fn parses_usd_rate() {
        let body = r#"{"data":{"currency":"BTC","rates":{"EUR":"41000.1","USD":"45123.45"}}}"#;
        assert_eq!(parse_usd_rate(body, "BTC").unwrap(), 45_123.45);
    }

    #[test]
    fn missing_data_is_error() {
        let err = parse_usd_rate(r#"{"errors":[{"id":"not_found"}]}"#, "BTC").unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[test]
    fn missing_usd_rate_is_error() {
        let body = r#"{"data":{"rates":{"EUR":"1.0"}}}"#;
        assert!(parse_usd_rate(body, "ETH").is_err());
    }

    #[test]
    fn non_numeric_rate_is_error() {
        let body = r#"{"data":{"rates":{"USD":"n/a"}}}"#;
        assert!(parse_usd_rate(body, "ETH").is_err());
    }

    #[test]
    fn negative_rate_is_error() {
        let body = r#"{"data":{"rates":{"USD":"-5"}}}"#;
        assert!(parse_usd_rate(body, "ETH").is_err());
    }

    #[test]
    fn non_json_body_is_error() {
        assert!(parse_usd_rate("<html>busy</html>", "BTC").is_err());
    }

    #[test]
    fn rates_url_uses_upper_case_symbol() {
        let provider = CoinbaseProvider::with_base_url("https://example.test/v2/", 5);
        assert_eq!(provider.base_url(), "https://example.test/v2");
        assert_eq!(
            provider.rates_url("eth"),
            "https://example.test/v2/exchange-rates?currency=ETH"
        );
    }

    #[test]
    fn default_provider_targets_coinbase() {
        let provider = CoinbaseProvider::new();
        assert_eq!(provider.base_url(), DEFAULT_PRICE_API_URL);
        assert_eq!(provider.name(), "Coinbase");
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceService
// ═══════════════════════════════════════════════════════════════════

mod price_service {
    use super::*;

    #[tokio::test]
    async fn returns_live_price() {
        let service = PriceService::new(
            Box::new(MockProvider::new(&[("BTC", 50_000.0)])),
            FallbackPrices::default(),
        );
        assert_eq!(service.last_price_usd("BTC").await, 50_000.0);
        assert_eq!(service.provider_name(), "Mock");
    }

    #[tokio::test]
    async fn failed_btc_lookup_returns_45000() {
        let service = PriceService::new(Box::new(FailingProvider), FallbackPrices::default());
        assert_eq!(service.last_price_usd("BTC").await, 45_000.0);
    }

    #[tokio::test]
    async fn failed_lookups_use_per_symbol_fallback() {
        let service = PriceService::new(Box::new(FailingProvider), FallbackPrices::default());
        assert_eq!(service.last_price_usd("ETH").await, 3_000.0);
        assert_eq!(service.last_price_usd("LTC").await, 0.0);
    }

    #[tokio::test]
    async fn missing_symbol_falls_back() {
        let service = PriceService::new(
            Box::new(MockProvider::new(&[("BTC", 50_000.0)])),
            FallbackPrices::default(),
        );
        assert_eq!(service.last_price_usd("ETH").await, 3_000.0);
    }

    #[tokio::test]
    async fn non_finite_live_price_falls_back() {
        let service = PriceService::new(
            Box::new(MockProvider::new(&[("ETH", f64::NAN)])),
            FallbackPrices::default(),
        );
        assert_eq!(service.last_price_usd("ETH").await, 3_000.0);
    }

    #[tokio::test]
    async fn custom_fallback_table() {
        let mut fallback = FallbackPrices::new();
        fallback.set("BTC", 1.0);
        let service = PriceService::new(Box::new(FailingProvider), fallback);
        assert_eq!(service.last_price_usd("BTC").await, 1.0);
        assert_eq!(service.fallback_prices().get("ETH"), 0.0);
    }

    #[tokio::test]
    async fn concurrent_lookups_are_not_deduplicated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = PriceService::new(
            Box::new(CountingProvider {
                calls: Arc::clone(&calls),
            }),
            FallbackPrices::default(),
        );

        let (a, b) = tokio::join!(service.last_price_usd("BTC"), service.last_price_usd("BTC"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let mut seen = vec![a, b];
        seen.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(seen, vec![100.0, 101.0]);
    }

    #[tokio::test]
    async fn unreachable_api_falls_back() {
        // Nothing listens on the discard port locally; the connection is refused.
        let settings = WalletSettings {
            price_api_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            ..WalletSettings::default()
        };
        let service = PriceService::from_settings(&settings);
        assert_eq!(service.provider_name(), "Coinbase");
        assert_eq!(service.last_price_usd("BTC").await, 45_000.0);
    }

    #[tokio::test]
    async fn server_error_status_falls_back() {
        let base = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"errors":[]}"#).await;
        let provider = CoinbaseProvider::with_base_url(&base, 5);
        let err = provider.get_usd_price("BTC").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));

        let base = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"errors":[]}"#).await;
        assert_eq!(coinbase_service(&base).last_price_usd("BTC").await, 45_000.0);
    }

    #[tokio::test]
    async fn successful_response_is_parsed() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"data":{"rates":{"USD":"123.5"}}}"#).await;
        assert_eq!(coinbase_service(&base).last_price_usd("ETH").await, 123.5);
    }

    #[tokio::test]
    async fn success_with_malformed_body_falls_back() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"data":{}}"#).await;
        assert_eq!(coinbase_service(&base).last_price_usd("ETH").await, 3_000.0);
    }
}
