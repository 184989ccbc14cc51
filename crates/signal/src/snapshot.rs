use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线的指标快照，是信号分类器的全部输入。
///
/// # Invariants
/// - 未定义的指标为 None。
/// - `macd_prev` 为上一根 K 线的 MACD，由调用方从指标表中取出。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub close: f64,
    // MA3
    pub ma_fast: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_medium: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_prev: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_long: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_squeeze: Option<bool>,
    pub volume_ratio: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub fib_position: Option<f64>,
}
