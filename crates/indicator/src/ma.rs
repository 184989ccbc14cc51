use crate::Series;
use crate::window::{RollingWindow, check_window, len_f64};
use klinesight_core::indicator::error::IndicatorError;

/// # Summary
/// 简单移动平均：最近 `window` 个值的算术平均。
///
/// # Returns
/// 前 `window - 1` 个位置为 None；数据不足时整列为 None。
pub fn sma(values: &[f64], window: usize) -> Result<Series, IndicatorError> {
    check_window("MA", window)?;
    let mut buf = RollingWindow::new(window);
    Ok(values
        .iter()
        .map(|&v| {
            buf.push(v);
            buf.mean()
        })
        .collect())
}

/// # Summary
/// 对含缺失值的序列做简单移动平均。
///
/// # Logic
/// 遇到 None 时清空窗口，要求窗口内连续 `window` 个值都有定义。
pub fn sma_opt(values: &[Option<f64>], window: usize) -> Result<Series, IndicatorError> {
    check_window("MA", window)?;
    let mut buf = RollingWindow::new(window);
    Ok(values
        .iter()
        .map(|v| match v {
            Some(v) => {
                buf.push(*v);
                buf.mean()
            }
            None => {
                buf.clear();
                None
            }
        })
        .collect())
}

/// # Summary
/// 指数移动平均，平滑系数 α = 2 / (N + 1)。
///
/// # Logic
/// 1. 以前 N 个值的简单平均作为种子，首个值位于下标 N - 1。
/// 2. 之后 ema = α·x + (1 − α)·ema_prev。
pub fn ema(values: &[f64], period: usize) -> Result<Series, IndicatorError> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_opt(&wrapped, period)
}

/// # Summary
/// 对含缺失值的序列计算 EMA，用于 MACD 信号线这类以预热序列为输入的场景。
///
/// # Logic
/// 1. 跳过缺失值，用随后连续 N 个有效值的简单平均作为种子。
/// 2. 中途遇到缺失值则重新播种。
pub fn ema_opt(values: &[Option<f64>], period: usize) -> Result<Series, IndicatorError> {
    check_window("EMA", period)?;
    let alpha = 2.0 / (len_f64(period) + 1.0);
    let mut seed = RollingWindow::new(period);
    let mut prev: Option<f64> = None;

    Ok(values
        .iter()
        .map(|v| {
            let Some(x) = *v else {
                seed.clear();
                prev = None;
                return None;
            };
            prev = match prev {
                Some(p) => Some(alpha * x + (1.0 - alpha) * p),
                None => {
                    seed.push(x);
                    seed.mean()
                }
            };
            prev
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_values() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_sma_warmup_count() {
        let closes: Vec<f64> = (0..30).map(f64::from).collect();
        let out = sma(&closes, 20).unwrap();
        assert_eq!(out.iter().filter(|v| v.is_some()).count(), 30 - 20 + 1);
        assert!(out[..19].iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_sma_insufficient_history() {
        let closes = vec![1.0; 10];
        let out = sma(&closes, 20).unwrap();
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_sma_opt_resets_on_gap() {
        let out = sma_opt(&[Some(1.0), Some(3.0), None, Some(5.0), Some(7.0)], 2).unwrap();
        assert_eq!(out, vec![None, Some(2.0), None, None, Some(6.0)]);
    }

    #[test]
    fn test_ema_seed_and_step() {
        let out = ema(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        // α = 0.5: 0.5*4 + 0.5*2 = 3
        assert_eq!(out[3], Some(3.0));
    }
}
