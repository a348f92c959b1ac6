use async_trait::async_trait;

use crate::errors::CoreError;

/// Abstraction over a live USD price source.
///
/// Implementations report every failure as an error; turning failures into
/// fallback prices is the job of [`crate::services::price_service::PriceService`].
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current USD price of one unit of `symbol`.
    async fn get_usd_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
