use super::error::StoreError;
use crate::common::TimeFrame;
use crate::market::ingest::RawTable;
use std::path::{Path, PathBuf};

/// # Summary
/// 一次分析运行产出的文件种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    // 原始行情
    Raw,
    // 行情 + 指标 + 信号
    Indicators,
    // 行情 + 指标
    Combined,
    // 文本报告
    Report,
}

impl ArtifactKind {
    /// # Summary
    /// 生成输出文件名，例如 `BTCUSDT_日线技术指标分析_20250101.csv`。
    ///
    /// # Arguments
    /// * `symbol`: 交易对。
    /// * `timeframe`: 周期，使用其中文名。
    /// * `date_stamp`: YYYYMMDD 日期戳。
    pub fn file_name(&self, symbol: &str, timeframe: TimeFrame, date_stamp: &str) -> String {
        let (suffix, ext) = match self {
            ArtifactKind::Raw => ("原始数据", "csv"),
            ArtifactKind::Indicators => ("技术指标分析", "csv"),
            ArtifactKind::Combined => ("组合数据", "csv"),
            ArtifactKind::Report => ("交易分析报告", "txt"),
        };
        format!(
            "{}_{}{}_{}.{}",
            symbol,
            timeframe.display_name(),
            suffix,
            date_stamp,
            ext
        )
    }
}

/// # Summary
/// 分析产物存储接口，负责表格与文本报告的落盘与读取。
///
/// # Invariants
/// - 文件名只包含名称，不含目录；目录由实现者决定。
pub trait ArtifactStore: Send + Sync {
    /// # Summary
    /// 保存一张表格。
    ///
    /// # Arguments
    /// * `file_name`: 目标文件名。
    /// * `table`: 表格内容。
    ///
    /// # Returns
    /// 成功返回写入的完整路径。
    fn save_table(&self, file_name: &str, table: &RawTable) -> Result<PathBuf, StoreError>;

    /// # Summary
    /// 读取一张表格。
    ///
    /// # Arguments
    /// * `path`: 文件路径。
    ///
    /// # Returns
    /// 成功返回表格，文件不存在返回 `StoreError::NotFound`。
    fn load_table(&self, path: &Path) -> Result<RawTable, StoreError>;

    /// # Summary
    /// 保存文本内容（报告）。
    ///
    /// # Returns
    /// 成功返回写入的完整路径。
    fn save_text(&self, file_name: &str, content: &str) -> Result<PathBuf, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            ArtifactKind::Raw.file_name("BTCUSDT", TimeFrame::Day1, "20250101"),
            "BTCUSDT_日线原始数据_20250101.csv"
        );
        assert_eq!(
            ArtifactKind::Report.file_name("BTCUSDT", TimeFrame::Hour4, "20250101"),
            "BTCUSDT_4小时线交易分析报告_20250101.txt"
        );
    }
}
