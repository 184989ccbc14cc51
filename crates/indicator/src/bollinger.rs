use crate::Series;
use crate::ma::sma_opt;
use crate::window::{RollingWindow, check_window};
use klinesight_core::indicator::error::IndicatorError;

/// 布林带三轨
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// # Summary
/// 布林带：中轨为 MA(period)，上下轨为中轨 ± k 倍总体标准差。
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> Result<BollingerOutput, IndicatorError> {
    check_window("BB", period)?;
    if !(k.is_finite() && k >= 0.0) {
        return Err(IndicatorError::InvalidParameter {
            indicator: "BB".to_string(),
            reason: format!("std multiplier {} must be non-negative", k),
        });
    }
    let mut buf = RollingWindow::new(period);
    let mut upper = Vec::with_capacity(closes.len());
    let mut middle = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for &c in closes {
        buf.push(c);
        match (buf.mean(), buf.std_pop()) {
            (Some(m), Some(sd)) => {
                upper.push(Some(m + k * sd));
                middle.push(Some(m));
                lower.push(Some(m - k * sd));
            }
            _ => {
                upper.push(None);
                middle.push(None);
                lower.push(None);
            }
        }
    }
    Ok(BollingerOutput {
        upper,
        middle,
        lower,
    })
}

/// 带宽 (upper − lower) / middle，中轨为 0 时未定义
pub fn width(bands: &BollingerOutput) -> Series {
    bands
        .upper
        .iter()
        .zip(&bands.middle)
        .zip(&bands.lower)
        .map(|((u, m), l)| {
            let (u, m, l) = ((*u)?, (*m)?, (*l)?);
            (m != 0.0).then(|| (u - l) / m)
        })
        .collect()
}

/// # Summary
/// 挤压标记：带宽低于其 `lookback` 期均值的 `factor` 倍时为 1.0，否则为 0.0。
pub fn squeeze(width: &[Option<f64>], lookback: usize, factor: f64) -> Result<Series, IndicatorError> {
    let mean = sma_opt(width, lookback)?;
    Ok(width
        .iter()
        .zip(&mean)
        .map(|(w, m)| {
            let (w, m) = ((*w)?, (*m)?);
            Some(if w < m * factor { 1.0 } else { 0.0 })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_order() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + f64::from(i % 7) * 1.3).collect();
        let out = bollinger(&closes, 20, 2.0).unwrap();
        for i in 19..50 {
            let (u, m, l) = (out.upper[i].unwrap(), out.middle[i].unwrap(), out.lower[i].unwrap());
            assert!(u >= m && m >= l);
        }
    }

    #[test]
    fn test_flat_series_collapses_bands() {
        let out = bollinger(&[100.1; 25], 20, 2.0).unwrap();
        let i = 24;
        assert_eq!(out.upper[i], out.middle[i]);
        assert_eq!(out.lower[i], out.middle[i]);
        assert_eq!(width(&out)[i], Some(0.0));
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        assert!(bollinger(&[1.0; 5], 3, -1.0).is_err());
    }
}
