use crate::common::TimeFrame;
use crate::market::entity::PriceBar;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 返回的 K 线按开盘时间升序排列。
/// - 实现者负责把底层错误映射为 `MarketError`。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取指定交易对最近若干根 K 线。
    ///
    /// # Logic
    /// 1. 将 TimeFrame 映射为数据源识别的 interval。
    /// 2. 构建请求并执行网络调用。
    /// 3. 解析响应为 `PriceBar` 列表。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码，例如 BTCUSDT。
    /// * `timeframe`: K 线周期。
    /// * `limit`: 请求的数量上限。
    ///
    /// # Returns
    /// 成功返回 K 线列表。
    async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketError>;
}
