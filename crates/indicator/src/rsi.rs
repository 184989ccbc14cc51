use crate::Series;
use crate::window::{check_window, len_f64};
use klinesight_core::indicator::error::IndicatorError;

/// # Summary
/// Wilder 平滑 RSI，取值 0–100。
///
/// # Logic
/// 1. 计算相邻收盘价涨跌。
/// 2. 首个平均涨幅/跌幅为前 `period` 个变化的简单平均，位于下标 `period`。
/// 3. 之后 avg = (avg·(period − 1) + x) / period。
/// 4. 涨跌均为 0 时 RSI = 50；仅跌幅为 0 时 RSI = 100。
///
/// # Returns
/// 前 `period` 个位置为 None。
pub fn rsi(closes: &[f64], period: usize) -> Result<Series, IndicatorError> {
    check_window("RSI", period)?;
    let mut out = vec![None; closes.len()];
    if closes.len() <= period {
        return Ok(out);
    }
    let p = len_f64(period);
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        if i < period {
            avg_gain += gain;
            avg_loss += loss;
            continue;
        } else if i == period {
            avg_gain = (avg_gain + gain) / p;
            avg_loss = (avg_loss + loss) / p;
        } else {
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        }
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    Ok(out)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_flat_is_fifty() {
        let out = rsi(&[100.0; 30], 14).unwrap();
        assert!(out[..14].iter().all(|v| v.is_none()));
        assert!(out[14..].iter().all(|v| *v == Some(50.0)));
    }

    #[test]
    fn test_rsi_monotonic() {
        let up: Vec<f64> = (1..=30).map(f64::from).collect();
        assert_eq!(rsi(&up, 14).unwrap()[29], Some(100.0));
        let down: Vec<f64> = up.iter().rev().copied().collect();
        assert_eq!(rsi(&down, 14).unwrap()[29], Some(0.0));
    }

    #[test]
    fn test_rsi_short_series() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).unwrap().iter().all(|v| v.is_none()));
    }
}
