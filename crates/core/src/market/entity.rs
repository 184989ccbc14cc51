use crate::market::error::MarketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，记录特定时段内的行情波动。
///
/// # Invariants
/// - `high` 应大于或等于 `open`, `close`, `low`。
/// - `volume` 非负。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    // K 线开盘时间
    pub open_time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: f64,
}

impl PriceBar {
    /// # Summary
    /// 检查 K 线是否满足 OHLCV 不变式。
    ///
    /// # Returns
    /// 满足时返回 None，否则返回第一条违反的约束描述。
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if [self.open, self.high, self.low, self.close]
            .iter()
            .any(|p| *p <= 0.0)
        {
            Some("non-positive price")
        } else if self.high < self.low {
            Some("high below low")
        } else if self.high < self.open.max(self.close) {
            Some("high below open/close")
        } else if self.low > self.open.min(self.close) {
            Some("low above open/close")
        } else if self.volume < 0.0 {
            Some("negative volume")
        } else {
            None
        }
    }
}

/// # Summary
/// 按开盘时间严格递增排列的 K 线序列，一次分析流程独占持有。
///
/// # Invariants
/// - 开盘时间严格递增，不允许重复。
/// - 不检查时间间隔是否连续。
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// # Summary
    /// 由任意顺序的 K 线构建序列。
    ///
    /// # Logic
    /// 1. 按开盘时间升序排序。
    /// 2. 相邻开盘时间相同则拒绝。
    ///
    /// # Arguments
    /// * `bars`: 原始 K 线列表。
    ///
    /// # Returns
    /// 成功返回序列，出现重复时间返回 `MarketError::DuplicateTimestamp`。
    pub fn new(mut bars: Vec<PriceBar>) -> Result<Self, MarketError> {
        bars.sort_by_key(|b| b.open_time);
        if let Some(pair) = bars.windows(2).find(|w| w[0].open_time == w[1].open_time) {
            return Err(MarketError::DuplicateTimestamp(pair[0].open_time));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn index(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.open_time).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(hour: u32, close: f64) -> PriceBar {
        PriceBar {
            open_time: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn test_series_sorted_on_build() {
        let series = PriceSeries::new(vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_invariant_violation() {
        assert_eq!(bar(1, 10.0).invariant_violation(), None);
        assert_eq!(
            PriceBar { high: 9.0, low: 11.0, ..bar(1, 10.0) }.invariant_violation(),
            Some("high below low")
        );
        assert_eq!(
            PriceBar { high: 9.5, low: 9.0, ..bar(1, 10.0) }.invariant_violation(),
            Some("high below open/close")
        );
        assert_eq!(
            PriceBar { volume: -1.0, ..bar(1, 10.0) }.invariant_violation(),
            Some("negative volume")
        );
        assert_eq!(bar(1, 0.0).invariant_violation(), Some("non-positive price"));
    }

    #[test]
    fn test_duplicate_open_time_rejected() {
        let err = PriceSeries::new(vec![bar(1, 1.0), bar(2, 2.0), bar(1, 9.0)]).unwrap_err();
        assert!(matches!(err, MarketError::DuplicateTimestamp(_)));
    }
}
