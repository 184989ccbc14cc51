use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理文件读写与 CSV 编解码失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 文件系统操作失败
    #[error("IO error: {0}")]
    Io(String),
    /// CSV 编解码失败
    #[error("CSV error: {0}")]
    Csv(String),
    /// 文件未找到
    #[error("Not found: {0}")]
    NotFound(String),
    /// 初始化存储失败
    #[error("Initialization error: {0}")]
    InitError(String),
}
