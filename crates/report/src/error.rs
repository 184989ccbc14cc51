use thiserror::Error;

/// # Summary
/// 报告渲染错误。
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Nothing to report: analysis has no bars")]
    EmptyAnalysis,
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),
}
