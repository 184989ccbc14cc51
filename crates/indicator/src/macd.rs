use crate::Series;
use crate::ma::{ema, ema_opt};
use klinesight_core::indicator::error::IndicatorError;

/// MACD 三线输出
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Series,
    pub signal: Series,
    pub hist: Series,
}

/// # Summary
/// MACD = EMA(fast) − EMA(slow)，信号线 = MACD 的 EMA(signal)，柱 = MACD − 信号线。
///
/// # Logic
/// 1. 校验 fast < slow。
/// 2. 分别计算快慢 EMA，二者都有定义时得到 MACD 线（首个值位于 slow − 1）。
/// 3. 对 MACD 线计算信号线，二者都有定义时得到柱状值。
///
/// # Arguments
/// * `closes`: 收盘价。
/// * `fast` / `slow` / `signal`: 周期。
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput, IndicatorError> {
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter {
            indicator: "MACD".to_string(),
            reason: format!("fast period {} must be shorter than slow period {}", fast, slow),
        });
    }
    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;
    let line: Series = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema_opt(&line, signal)?;
    let hist = line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    Ok(MacdOutput {
        macd: line,
        signal: signal_line,
        hist,
    })
}
