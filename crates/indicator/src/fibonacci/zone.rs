use crate::window::{RollingWindow, check_window};
use klinesight_core::indicator::error::IndicatorError;
use klinesight_core::indicator::fibonacci::{
    EXTENSION_RATIOS, FibLevel, FibTrend, FibonacciZone, RETRACEMENT_RATIOS,
};
use klinesight_core::market::entity::PriceSeries;

/// # Summary
/// 由窗口高低点与当前收盘价构建斐波那契区域。
///
/// # Logic
/// 1. high <= low 时不生成区域。
/// 2. 位置 = (close − low)/(high − low)，> 0.6 为上升，< 0.4 为下降，其余为中性。
/// 3. 回调价位：上升趋势 high − range·r，其余 low + range·r。
/// 4. 扩展价位：下降趋势 low − range·(r − 1)，其余 high + range·(r − 1)。
pub fn build_zone(high: f64, low: f64, close: f64) -> Option<FibonacciZone> {
    let range = high - low;
    if range <= 0.0 || !range.is_finite() {
        return None;
    }
    let position = (close - low) / range;
    let trend = if position > 0.6 {
        FibTrend::Uptrend
    } else if position < 0.4 {
        FibTrend::Downtrend
    } else {
        FibTrend::Neutral
    };

    let retracements = RETRACEMENT_RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: match trend {
                FibTrend::Uptrend => high - range * ratio,
                _ => low + range * ratio,
            },
        })
        .collect();
    let extensions = EXTENSION_RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: match trend {
                FibTrend::Downtrend => low - range * (ratio - 1.0),
                _ => high + range * (ratio - 1.0),
            },
        })
        .collect();

    Some(FibonacciZone {
        high,
        low,
        trend,
        retracements,
        extensions,
    })
}

/// # Summary
/// 逐根 K 线检测斐波那契区域。
///
/// # Logic
/// 1. 对最高价/最低价做宽度 2L+1 的滚动最大/最小，下标 i + L 处的值即以 i 为中心的窗口极值。
/// 2. 仅对 L <= i < n − L 的 K 线计算区域，零宽窗口跳过。
/// 3. 自左向右一次遍历，把最近一次计算出的区域整体向后填充；首个区域之前为 None。
///
/// # Arguments
/// * `series`: 行情序列。
/// * `lookback`: 单侧回看长度 L。
///
/// # Returns
/// 与序列等长的区域列表。
pub fn detect_zones(
    series: &PriceSeries,
    lookback: usize,
) -> Result<Vec<Option<FibonacciZone>>, IndicatorError> {
    check_window("FIB", lookback)?;
    let bars = series.bars();
    let n = bars.len();
    let width = 2 * lookback + 1;

    let mut window_high = RollingWindow::new(width);
    let mut window_low = RollingWindow::new(width);
    let extremes: Vec<Option<(f64, f64)>> = bars
        .iter()
        .map(|b| {
            window_high.push(b.high);
            window_low.push(b.low);
            Some((window_high.max()?, window_low.min()?))
        })
        .collect();

    let mut zones = Vec::with_capacity(n);
    let mut last: Option<FibonacciZone> = None;
    for (i, bar) in bars.iter().enumerate() {
        let computed = extremes
            .get(i + lookback)
            .copied()
            .flatten()
            .filter(|_| i >= lookback)
            .and_then(|(high, low)| build_zone(high, low, bar.close));
        if computed.is_some() {
            last = computed;
        }
        zones.push(last.clone());
    }
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_follow_trend() {
        let up = build_zone(200.0, 100.0, 190.0).unwrap();
        assert_eq!(up.trend, FibTrend::Uptrend);
        assert_eq!(up.retracement(0.0), Some(200.0));
        assert_eq!(up.retracement(1.0), Some(100.0));
        assert_eq!(up.extension(1.272).map(|p| (p * 1000.0).round()), Some(227_200.0));

        let down = build_zone(200.0, 100.0, 110.0).unwrap();
        assert_eq!(down.trend, FibTrend::Downtrend);
        assert_eq!(down.retracement(0.0), Some(100.0));
        assert_eq!(down.retracement(1.0), Some(200.0));
        assert!(down.extension(1.414).unwrap() < 100.0);

        let neutral = build_zone(200.0, 100.0, 150.0).unwrap();
        assert_eq!(neutral.trend, FibTrend::Neutral);
        assert!(neutral.extension(1.272).unwrap() > 200.0);
    }

    #[test]
    fn test_degenerate_window() {
        assert!(build_zone(100.0, 100.0, 100.0).is_none());
    }
}
