use crate::market::entity::{PriceBar, PriceSeries};
use crate::market::error::MarketError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

/// # Summary
/// 与文件格式无关的二维表：一行表头加若干字符串单元格行。
/// 作为 CSV 读写与行情导入之间的交换格式。
///
/// # Invariants
/// - 每行单元格数量不保证与表头一致，读取时按下标取值，缺失视为空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    // 列名
    pub headers: Vec<String>,
    // 数据行
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 按列名查找下标，忽略首尾空白、BOM 与英文大小写。
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
    }

    /// 取指定行指定列的单元格，越界返回 None。
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }
}

// 必需列及其可接受的别名，第一个名字用于错误信息
const REQUIRED_COLUMNS: [(&str, &[&str]); 6] = [
    ("open_time", &["open_time", "开盘时间", "timestamp", "time"]),
    ("open", &["open", "开盘价"]),
    ("high", &["high", "最高价"]),
    ("low", &["low", "最低价"]),
    ("close", &["close", "收盘价"]),
    ("volume", &["volume", "成交量"]),
];

impl PriceSeries {
    /// # Summary
    /// 从原始表格导入行情序列。
    ///
    /// # Logic
    /// 1. 定位全部必需列，任一缺失即返回包含所有缺失列名的错误，不做任何计算。
    /// 2. 逐行解析；收盘价无法解析的行直接丢弃。
    /// 3. 其余字段解析失败视为数据损坏，返回 `MarketError::Parse`。
    /// 4. 违反 OHLCV 不变式的行保留，逐行记录告警。
    /// 5. 交由 `PriceSeries::new` 排序并检查重复时间。
    ///
    /// # Arguments
    /// * `table`: 原始表格。
    ///
    /// # Returns
    /// 成功返回 `PriceSeries`。
    pub fn from_table(table: &RawTable) -> Result<Self, MarketError> {
        let mut indices = [0usize; 6];
        let mut missing = Vec::new();
        for (slot, (canonical, aliases)) in REQUIRED_COLUMNS.iter().enumerate() {
            match aliases.iter().find_map(|alias| table.column_index(alias)) {
                Some(idx) => indices[slot] = idx,
                None => missing.push((*canonical).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(MarketError::MissingColumns(missing));
        }
        let [time_col, open_col, high_col, low_col, close_col, volume_col] = indices;

        let mut bars = Vec::with_capacity(table.rows.len());
        for row in 0..table.rows.len() {
            let Some(close) = table.cell(row, close_col).and_then(parse_number) else {
                debug!(row, "dropping row without close price");
                continue;
            };
            let field = |col: usize, name: &str| {
                table
                    .cell(row, col)
                    .and_then(parse_number)
                    .ok_or_else(|| MarketError::Parse(format!("row {}: invalid {}", row + 1, name)))
            };
            let raw_time = table.cell(row, time_col).unwrap_or_default();
            let open_time = parse_timestamp(raw_time).ok_or_else(|| {
                MarketError::Parse(format!("row {}: invalid open_time '{}'", row + 1, raw_time))
            })?;
            let bar = PriceBar {
                open_time,
                open: field(open_col, "open")?,
                high: field(high_col, "high")?,
                low: field(low_col, "low")?,
                close,
                volume: field(volume_col, "volume")?,
            };
            if let Some(reason) = bar.invariant_violation() {
                warn!(row = row + 1, %open_time, reason, "bar violates OHLCV invariants");
            }
            bars.push(bar);
        }

        PriceSeries::new(bars)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// # Summary
/// 解析开盘时间单元格。
///
/// # Logic
/// 依次尝试 RFC3339、`%Y-%m-%d %H:%M:%S`、`%Y-%m-%d %H:%M`、`%Y-%m-%d` 与毫秒时间戳，
/// 无时区信息的一律按 UTC 处理。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    raw.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut t = RawTable::new(headers.iter().map(|s| s.to_string()).collect());
        for r in rows {
            t.push_row(r.iter().map(|s| s.to_string()).collect());
        }
        t
    }

    #[test]
    fn test_missing_columns_are_named() {
        let t = table(&["open_time", "open", "close"], &[&["2025-01-01", "1", "1"]]);
        match PriceSeries::from_table(&t) {
            Err(MarketError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["high", "low", "volume"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_chinese_headers_accepted() {
        let t = table(
            &["开盘时间", "开盘价", "最高价", "最低价", "收盘价", "成交量"],
            &[
                &["2025-01-02 00:00:00", "2", "3", "1", "2.5", "10"],
                &["2025-01-01 00:00:00", "1", "2", "0.5", "1.5", "20"],
            ],
        );
        let series = PriceSeries::from_table(&t).unwrap();
        assert_eq!(series.closes(), vec![1.5, 2.5]);
        assert_eq!(series.volumes(), vec![20.0, 10.0]);
    }

    #[test]
    fn test_rows_without_close_dropped() {
        let t = table(
            &["open_time", "open", "high", "low", "close", "volume"],
            &[
                &["1735689600000", "1", "2", "0.5", "", "5"],
                &["1735693200000", "1", "2", "0.5", "1.2", "5"],
            ],
        );
        let series = PriceSeries::from_table(&t).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_inconsistent_rows_kept() {
        let t = table(
            &["open_time", "open", "high", "low", "close", "volume"],
            &[
                &["1735689600000", "10", "9", "11", "10", "5"],
                &["1735693200000", "10", "12", "9", "11", "-3"],
                &["1735696800000", "10", "12", "9", "11", "4"],
            ],
        );
        let series = PriceSeries::from_table(&t).unwrap();
        assert_eq!(series.len(), 3);
        let flagged: Vec<Option<&str>> =
            series.bars().iter().map(PriceBar::invariant_violation).collect();
        assert_eq!(flagged, vec![Some("high below low"), Some("negative volume"), None]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-01-01T08:00:00+08:00").is_some());
        assert!(parse_timestamp("2025-01-01 08:00").is_some());
        assert_eq!(
            parse_timestamp("2025-01-01"),
            parse_timestamp("1735689600000")
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
