use crate::domain::entities::price_bar::PriceBar;
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Daily bars covering roughly the last `days` calendar days, oldest first.
    /// An unknown symbol yields an empty list rather than an error.
    async fn daily_history(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, DomainError>;
}
