use klinesight_core::market::error::MarketError;
use thiserror::Error;

/// # Summary
/// 分析流程边界上的错误。
///
/// # Invariants
/// - 单个指标的失败不会出现在这里，而是记录在 `AnalysisFrame::failures` 中。
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Market data error: {0}")]
    Market(#[from] MarketError),
    #[error("Price series is empty")]
    EmptySeries,
}
