use crate::error::AnalysisError;
use klinesight_core::common::TimeFrame;
use klinesight_core::config::{AnalysisConfig, IndicatorProfile, SignalThresholds};
use klinesight_core::indicator::columns as col;
use klinesight_core::indicator::entity::{IndicatorFailure, IndicatorFrame};
use klinesight_core::indicator::fibonacci::{FibonacciReading, FibonacciZone};
use klinesight_core::market::entity::PriceSeries;
use klinesight_core::market::ingest::RawTable;
use klinesight_core::signal::entity::SignalSet;
use klinesight_indicator::engine::IndicatorEngine;
use klinesight_indicator::fibonacci::{signal, zone};
use klinesight_signal::classifier::SignalClassifier;
use klinesight_signal::snapshot::BarSnapshot;
use tracing::{info, warn};

// 斐波那契步骤在失败列表中的名称
const FIB_STEP: &str = "FIB";

/// # Summary
/// 一次分析运行的完整结果，所有逐行数据与 `series` 对齐。
#[derive(Debug, Clone)]
pub struct AnalysisFrame {
    pub timeframe: TimeFrame,
    // 解析后的参数档位（含激进模式缩放）
    pub profile: IndicatorProfile,
    // 生效的信号阈值
    pub thresholds: SignalThresholds,
    pub series: PriceSeries,
    pub frame: IndicatorFrame,
    // 前向填充后的斐波那契区域
    pub zones: Vec<Option<FibonacciZone>>,
    pub readings: Vec<FibonacciReading>,
    pub signals: Vec<SignalSet>,
    pub failures: Vec<IndicatorFailure>,
}

impl AnalysisFrame {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 最后一根 K 线的行号
    pub fn last_row(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.frame.value(name, row)
    }

    /// 短期均线列名
    pub fn ma_short_column(&self) -> String {
        col::ma(self.profile.ma_short)
    }

    /// 中期均线列名
    pub fn ma_medium_column(&self) -> String {
        col::ma(self.profile.ma_medium())
    }
}

/// # Summary
/// 分析流程入口：指标计算 → 斐波那契区域与信号 → 逐行信号分类。
///
/// # Logic
/// 1. 按周期解析参数档位与阈值。
/// 2. 运行指标引擎，单个指标失败被隔离记录。
/// 3. 检测斐波那契区域；失败时记录并视为无区域。
/// 4. 结合量比计算每根 K 线的斐波那契读数。
/// 5. 为每根 K 线构造快照并分类。
///
/// # Arguments
/// * `series`: 已校验的行情序列。
/// * `config`: 分析配置。
/// * `timeframe`: K 线周期，用于选择参数档位。
///
/// # Returns
/// 分析结果；序列为空时返回 `AnalysisError::EmptySeries`。
pub fn analyze(
    series: PriceSeries,
    config: &AnalysisConfig,
    timeframe: TimeFrame,
) -> Result<AnalysisFrame, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let profile = config.resolve(timeframe);
    let thresholds = config.effective_thresholds();

    let output = IndicatorEngine::new(&profile, &thresholds).compute(&series);
    let frame = output.frame;
    let mut failures = output.failures;

    let zones = match zone::detect_zones(&series, profile.fib_lookback) {
        Ok(zones) => zones,
        Err(e) => {
            warn!(indicator = FIB_STEP, error = %e, "fibonacci detection failed, no zones");
            failures.push(IndicatorFailure {
                indicator: FIB_STEP.to_string(),
                reason: e.to_string(),
            });
            vec![None; series.len()]
        }
    };
    let volume_ratio = frame
        .column(col::VOLUME_RATIO)
        .map(<[Option<f64>]>::to_vec)
        .unwrap_or_default();
    let readings = signal::read_series(&series, &zones, &volume_ratio, &thresholds);

    let classifier = SignalClassifier::for_profile(thresholds.clone(), &profile);
    let signals = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| classifier.classify(&snapshot(bar.close, &frame, &readings, &profile, i)))
        .collect::<Vec<_>>();

    info!(
        timeframe = %timeframe,
        bars = series.len(),
        failures = failures.len(),
        composite = signals.last().map(|s| s.composite.label()).unwrap_or_default(),
        "analysis completed"
    );
    Ok(AnalysisFrame {
        timeframe,
        profile,
        thresholds,
        series,
        frame,
        zones,
        readings,
        signals,
        failures,
    })
}

/// # Summary
/// 从原始表格开始的分析入口。
///
/// # Returns
/// 缺少必需列时返回 `MarketError::MissingColumns`，不做任何计算。
pub fn analyze_table(
    table: &RawTable,
    config: &AnalysisConfig,
    timeframe: TimeFrame,
) -> Result<AnalysisFrame, AnalysisError> {
    let series = PriceSeries::from_table(table)?;
    analyze(series, config, timeframe)
}

// 从指标表中取出第 i 行的分类输入
fn snapshot(
    close: f64,
    frame: &IndicatorFrame,
    readings: &[FibonacciReading],
    profile: &IndicatorProfile,
    i: usize,
) -> BarSnapshot {
    let v = |name: &str| frame.value(name, i);
    // 长期 RSI 与主 RSI 同周期时不单独成列
    let rsi_long = if frame.has_column(col::RSI_LONG) {
        v(col::RSI_LONG)
    } else {
        v(col::RSI)
    };
    BarSnapshot {
        close,
        ma_fast: v(col::MA_FAST),
        ma_short: v(&col::ma(profile.ma_short)),
        ma_medium: v(&col::ma(profile.ma_medium())),
        macd: v(col::MACD),
        macd_signal: v(col::MACD_SIGNAL),
        macd_prev: i.checked_sub(1).and_then(|p| frame.value(col::MACD, p)),
        rsi: v(col::RSI),
        rsi_long,
        bb_upper: v(col::BB_UPPER),
        bb_middle: v(col::BB_MIDDLE),
        bb_lower: v(col::BB_LOWER),
        bb_squeeze: v(col::BB_SQUEEZE).map(|flag| flag > 0.5),
        volume_ratio: v(col::VOLUME_RATIO),
        stoch_k: v(col::STOCH_SLOW_K),
        stoch_d: v(col::STOCH_SLOW_D),
        fib_position: readings.get(i).and_then(|r| r.position),
    }
}
