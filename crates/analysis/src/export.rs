use crate::pipeline::AnalysisFrame;
use chrono::{DateTime, Utc};
use klinesight_core::indicator::fibonacci::{
    EXTENSION_RATIOS, FibonacciZone, RETRACEMENT_RATIOS, extension_column, retracement_column,
};
use klinesight_core::market::entity::{PriceBar, PriceSeries};
use klinesight_core::market::ingest::RawTable;

// 导出文件中的时间格式
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const OPEN_TIME: &str = "open_time";
pub const COMPOSITE: &str = "综合信号";
pub const COMPUTED_AT: &str = "计算时间";

// 原始数据列（中文列名，导入时同样可识别）
const PRICE_HEADERS: [&str; 5] = ["开盘价", "最高价", "最低价", "收盘价", "成交量"];

// 组合数据中不保留的分项信号列
const COMBINED_DROPPED: [&str; 7] = [
    COMPUTED_AT,
    "MA_Signal",
    "MACD_Signal_Analysis",
    "RSI_Signal",
    "BB_Signal",
    "Stoch_Signal",
    COMPOSITE,
];

/// # Summary
/// 按列构建、按行输出的表格。
struct ColumnTable {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl ColumnTable {
    fn new() -> Self {
        Self {
            headers: Vec::new(),
            columns: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, cells: Vec<String>) {
        self.headers.push(name.into());
        self.columns.push(cells);
    }

    fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        let (headers, columns): (Vec<String>, Vec<Vec<String>>) = self
            .headers
            .drain(..)
            .zip(self.columns.drain(..))
            .filter(|(name, _)| keep(name.as_str()))
            .unzip();
        self.headers = headers;
        self.columns = columns;
    }

    fn into_table(self, rows: usize) -> RawTable {
        let mut table = RawTable::new(self.headers);
        for i in 0..rows {
            let row = self
                .columns
                .iter()
                .map(|c| c.get(i).cloned().unwrap_or_default())
                .collect();
            table.push_row(row);
        }
        table
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn label<T>(value: Option<T>, f: impl Fn(T) -> &'static str) -> String {
    value.map(f).unwrap_or_default().to_string()
}

fn zone_values(
    zones: &[Option<FibonacciZone>],
    f: impl Fn(&FibonacciZone) -> Option<f64>,
) -> Vec<String> {
    zones.iter().map(|z| number(z.as_ref().and_then(&f))).collect()
}

fn price_columns(series: &PriceSeries) -> ColumnTable {
    let bars = series.bars();
    let mut t = ColumnTable::new();
    t.push(
        OPEN_TIME,
        bars.iter().map(|b| b.open_time.format(TIME_FORMAT).to_string()).collect(),
    );
    let fields: [fn(&PriceBar) -> f64; 5] = [
        |b| b.open,
        |b| b.high,
        |b| b.low,
        |b| b.close,
        |b| b.volume,
    ];
    for (name, field) in PRICE_HEADERS.iter().zip(fields) {
        t.push(*name, bars.iter().map(|b| field(b).to_string()).collect());
    }
    t
}

/// # Summary
/// 原始行情表：开盘时间加 OHLCV。
pub fn raw_table(series: &PriceSeries) -> RawTable {
    price_columns(series).into_table(series.len())
}

/// # Summary
/// 价格列、全部指标列、斐波那契列与全部信号列，不含计算时间。
///
/// # Logic
/// 1. 价格列。
/// 2. 指标表各列，按计算顺序。
/// 3. 斐波那契区域高低点、趋势、回调/扩展价位、价格位置、支撑阻力与信号。
/// 4. 分项信号与综合信号。
fn analysis_columns(a: &AnalysisFrame) -> ColumnTable {
    let mut t = price_columns(&a.series);
    for column in a.frame.columns() {
        t.push(column.name.as_str(), column.values.iter().map(|v| number(*v)).collect());
    }

    t.push("Fib_High", zone_values(&a.zones, |z| Some(z.high)));
    t.push("Fib_Low", zone_values(&a.zones, |z| Some(z.low)));
    t.push(
        "Fib_Trend",
        a.zones.iter().map(|z| label(z.as_ref(), |z| z.trend.label())).collect(),
    );
    for ratio in RETRACEMENT_RATIOS {
        t.push(retracement_column(ratio), zone_values(&a.zones, |z| z.retracement(ratio)));
    }
    for ratio in EXTENSION_RATIOS {
        t.push(extension_column(ratio), zone_values(&a.zones, |z| z.extension(ratio)));
    }
    let readings = &a.readings;
    t.push("Fib_Price_Position", readings.iter().map(|r| number(r.position)).collect());
    t.push("Fib_Support_Level", readings.iter().map(|r| number(r.support)).collect());
    t.push("Fib_Resistance_Level", readings.iter().map(|r| number(r.resistance)).collect());
    t.push("Fib_Signal", readings.iter().map(|r| r.signal.label()).collect());

    let s = &a.signals;
    t.push("Fib_Key_Zone", s.iter().map(|x| label(x.fib_key_zone, |v| v.label())).collect());
    t.push("MA_Fast_Signal", s.iter().map(|x| label(x.ma_fast, |v| v.label())).collect());
    t.push("MA_Signal", s.iter().map(|x| label(x.ma, |v| v.label())).collect());
    t.push("MACD_Signal_Analysis", s.iter().map(|x| label(x.macd, |v| v.label())).collect());
    t.push("MACD_Zero_Cross", s.iter().map(|x| label(x.macd_zero_cross, |v| v.label())).collect());
    t.push("RSI_Signal", s.iter().map(|x| label(x.rsi, |v| v.label())).collect());
    t.push("BB_Signal", s.iter().map(|x| label(x.bb, |v| v.label())).collect());
    t.push(
        "BB_Breakout_Strength",
        s.iter().map(|x| label(x.bb_breakout, |v| v.label())).collect(),
    );
    t.push("Stoch_Signal", s.iter().map(|x| label(x.stoch, |v| v.label())).collect());
    t.push(COMPOSITE, s.iter().map(|x| x.composite.label().to_string()).collect());
    t
}

/// # Summary
/// 技术指标表：价格列、全部指标列、全部信号列、综合信号与计算时间。
///
/// # Arguments
/// * `analysis`: 分析结果。
/// * `computed_at`: 写入计算时间列的时刻。
pub fn indicator_table(analysis: &AnalysisFrame, computed_at: DateTime<Utc>) -> RawTable {
    let mut t = analysis_columns(analysis);
    t.push(
        COMPUTED_AT,
        vec![computed_at.format(TIME_FORMAT).to_string(); analysis.len()],
    );
    t.into_table(analysis.len())
}

/// # Summary
/// 组合数据表：原始列加指标列，去掉分项信号标签与综合信号。
pub fn combined_table(analysis: &AnalysisFrame) -> RawTable {
    let mut t = analysis_columns(analysis);
    t.retain(|name| !COMBINED_DROPPED.contains(&name));
    t.into_table(analysis.len())
}
