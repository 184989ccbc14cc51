use klinesight_analysis::error::AnalysisError;
use klinesight_core::config::ConfigError;
use klinesight_core::market::error::MarketError;
use klinesight_core::store::error::StoreError;
use klinesight_report::error::ReportError;
use thiserror::Error;

/// # Summary
/// 应用层错误，汇总各领域错误。
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
