use crate::indicator::error::IndicatorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 一列派生指标值，与行情序列逐行对齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    // 列名，例如 MA20、MACD_Signal
    pub name: String,
    // 每根 K 线的指标值，预热期为 None
    pub values: Vec<Option<f64>>,
}

/// # Summary
/// 指标表：按时间索引与行情序列一一对齐的多列指标集合。
///
/// # Invariants
/// - 每列长度等于时间索引长度。
/// - 列名唯一，保留插入顺序。
/// - 窗口类指标在历史不足时为 None。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl IndicatorFrame {
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// # Summary
    /// 追加一列。
    ///
    /// # Logic
    /// 1. 校验长度与时间索引一致。
    /// 2. 同名列已存在时保留原列（同一窗口只计算一次）。
    ///
    /// # Returns
    /// 长度不符返回 `IndicatorError::LengthMismatch`。
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), IndicatorError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(IndicatorError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        if !self.has_column(&name) {
            self.columns.push(Column { name, values });
        }
        Ok(())
    }

    /// 按列名取整列
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// 按列名与行号取单个值，列不存在或值未定义都返回 None
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|c| c.get(row).copied().flatten())
    }
}

/// # Summary
/// 单个指标计算失败的记录，失败指标的列以 None 填充，其余指标照常输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFailure {
    // 指标名称
    pub indicator: String,
    // 失败原因
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_push_and_lookup() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut frame = IndicatorFrame::new(vec![t0, t0 + chrono::Duration::hours(1)]);
        frame.push_column("MA2", vec![None, Some(1.5)]).unwrap();
        // 同名列不覆盖
        frame.push_column("MA2", vec![Some(9.0), Some(9.0)]).unwrap();

        assert_eq!(frame.value("MA2", 1), Some(1.5));
        assert_eq!(frame.value("MA2", 0), None);
        assert_eq!(frame.value("MA9", 1), None);
        assert_eq!(frame.columns().len(), 1);

        let err = frame.push_column("RSI", vec![None]).unwrap_err();
        assert!(matches!(err, IndicatorError::LengthMismatch { expected: 2, actual: 1, .. }));
    }
}
