use crate::Series;
use crate::window::{check_window, len_f64};
use klinesight_core::indicator::error::IndicatorError;

/// 真实波幅 TR = max(high − low, |high − prevClose|, |low − prevClose|)
pub(crate) fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// # Summary
/// Wilder 平滑平均真实波幅。
///
/// # Logic
/// 1. 从第二根 K 线起计算 TR。
/// 2. 首个 ATR 位于下标 `period`，为 TR[1..=period] 的均值。
/// 3. 之后 ATR = (ATR_prev·(period − 1) + TR) / period。
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<Series, IndicatorError> {
    check_window("ATR", period)?;
    let n = closes.len();
    let mut out = vec![None; n];
    if n <= period {
        return Ok(out);
    }
    let p = len_f64(period);
    let mut value = 0.0;
    for i in 1..n {
        let tr = true_range(highs[i], lows[i], closes[i - 1]);
        if i < period {
            value += tr;
            continue;
        } else if i == period {
            value = (value + tr) / p;
        } else {
            value = (value * (p - 1.0) + tr) / p;
        }
        out[i] = Some(value);
    }
    Ok(out)
}

/// 两列逐行相除，分母为 0 或任一侧未定义时为 None
pub fn ratio(numerator: &[Option<f64>], denominator: &[Option<f64>]) -> Series {
    numerator
        .iter()
        .zip(denominator)
        .map(|(a, b)| {
            let (a, b) = ((*a)?, (*b)?);
            (b != 0.0).then(|| a / b)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atr_constant_range() {
        let closes = vec![10.0; 20];
        let highs = vec![11.0; 20];
        let lows = vec![9.0; 20];
        let out = atr(&highs, &lows, &closes, 14).unwrap();
        assert!(out[13].is_none());
        assert_eq!(out[14], Some(2.0));
        assert_eq!(out[19], Some(2.0));
    }

    #[test]
    fn test_true_range_gap() {
        // 跳空高开时 TR 取与前收的距离
        assert_eq!(true_range(15.0, 14.0, 10.0), 5.0);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        let out = ratio(&[Some(1.0), Some(2.0), None], &[Some(0.0), Some(4.0), Some(1.0)]);
        assert_eq!(out, vec![None, Some(0.5), None]);
    }
}
