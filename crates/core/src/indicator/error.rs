use thiserror::Error;

/// # Summary
/// 指标计算错误枚举。
///
/// # Invariants
/// - 历史数据不足不是错误，由 `None` 单元格表达。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    // 窗口长度非法（例如 0）
    #[error("Invalid window for {indicator}: {window}")]
    InvalidWindow { indicator: String, window: usize },
    // 参数非法（例如负的标准差倍数）
    #[error("Invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },
    // 列长度与时间索引不一致
    #[error("Column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}
