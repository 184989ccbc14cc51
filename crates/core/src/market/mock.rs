use crate::common::TimeFrame;
use crate::market::entity::PriceBar;
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;

/// # Summary
/// 基于内存的行情提供者，供测试注入固定数据。
pub struct StaticProvider {
    bars: Vec<PriceBar>,
}

impl StaticProvider {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_klines(
        &self,
        _: &str,
        _: TimeFrame,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        if self.bars.is_empty() {
            return Err(MarketError::NotFound);
        }
        let skip = self.bars.len().saturating_sub(limit);
        Ok(self.bars[skip..].to_vec())
    }
}
